fn main() {
    // ESP-IDF sysenv propagation is only meaningful when building the
    // firmware binary for the device target.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
