//! Named task spawning.
//!
//! ESP-IDF pthreads inherit their FreeRTOS task name and stack size from
//! the esp_pthread config that is live at spawn time, not from
//! `std::thread::Builder`, so the two attributes are routed through
//! `esp_pthread_set_cfg` on device.  On the host the builder alone does
//! the job.

use std::io;
use std::thread::JoinHandle;

/// Spawn a named thread with an explicit stack size.
///
/// The name shows up in FreeRTOS task lists and panic messages; keep it
/// under the IDF's 16-byte task-name limit.
#[cfg(target_os = "espidf")]
pub fn spawn_named<F>(name: &'static str, stack_kb: usize, f: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    use esp_idf_svc::sys::{esp_pthread_get_default_config, esp_pthread_set_cfg};

    // The IDF keeps the name pointer for the lifetime of the task, so it
    // must outlive this call.  Two tasks per boot; leaking is fine.
    let c_name = std::ffi::CString::new(name)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "task name contains NUL"))?;

    // SAFETY: esp_pthread config is process-global state consumed at the
    // next pthread_create; both spawns happen from the same task, so the
    // set/spawn pairs cannot interleave.
    unsafe {
        let mut cfg = esp_pthread_get_default_config();
        cfg.thread_name = c_name.into_raw();
        cfg.stack_size = stack_kb * 1024;
        esp_pthread_set_cfg(&cfg);
    }

    std::thread::Builder::new().name(name.into()).spawn(f)
}

#[cfg(not(target_os = "espidf"))]
pub fn spawn_named<F>(name: &'static str, stack_kb: usize, f: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    std::thread::Builder::new()
        .name(name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
}
