use mempool_core::error;
use std::{any::Any, panic, process, thread};

/// Configures the panic hook to log every panic and exit the program.
///
/// Nothing is written to stdout, which is reserved for command output.
pub fn configure_panic() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let (file, line, column) = match panic_info.location() {
            Some(location) => (location.file(), location.line(), location.column()),
            None => ("unknown", 0, 0),
        };

        let message = payload_message(panic_info.payload());
        let current_thread = thread::current();
        let thread_name = current_thread.name().unwrap_or("<unnamed>");
        error!("thread '{}' panicked at {}:{}:{}: {}", thread_name, file, line, column, message);
        // File appenders buffer, make sure the panic line reaches them before exiting
        ::log::logger().flush();
        // The default hook may print additional info such as the full backtrace
        default_hook(panic_info);
        eprintln!("Exiting...");
        process::exit(1);
    }));
}

fn payload_message(payload: &(dyn Any + Send)) -> &str {
    match payload.downcast_ref::<&str>() {
        Some(s) => *s,
        None => match payload.downcast_ref::<String>() {
            Some(s) => &s[..],
            None => "Box<dyn Any>",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_message() {
        let payload = panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(payload_message(payload.as_ref()), "static message");

        let payload = panic::catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
        assert_eq!(payload_message(payload.as_ref()), "formatted 42");

        let payload = panic::catch_unwind(|| panic::panic_any(7u8)).unwrap_err();
        assert_eq!(payload_message(payload.as_ref()), "Box<dyn Any>");
    }
}
