use std::string::String;
use std::vec::Vec;

use spin::Mutex;

use crate::klog::{KlogLevel, KlogSink, is_enabled_level};
use crate::{
    ServiceCell, align_down_usize, align_up_usize, klog_attach_sink, klog_get_level,
    klog_has_sink, klog_info, klog_init, klog_set_level, klog_trace, klog_warn,
};

struct CaptureSink {
    bytes: Mutex<Vec<u8>>,
}

impl KlogSink for CaptureSink {
    fn write_bytes(&self, bytes: &[u8]) {
        self.bytes.lock().extend_from_slice(bytes);
    }
}

static CAPTURE: CaptureSink = CaptureSink {
    bytes: Mutex::new(Vec::new()),
};

struct Other;

impl KlogSink for Other {
    fn write_bytes(&self, _bytes: &[u8]) {}
}

static OTHER: Other = Other;

// Level and sink are process-wide, so the whole klog contract is checked in one test.
#[test]
fn klog_filters_by_level_and_keeps_first_sink() {
    klog_info!("dropped before any sink");
    assert!(klog_attach_sink(&CAPTURE));
    assert!(!klog_attach_sink(&OTHER));
    assert!(klog_has_sink());

    klog_init();
    assert_eq!(klog_get_level(), KlogLevel::Info);
    assert!(is_enabled_level(KlogLevel::Warn));
    assert!(!is_enabled_level(KlogLevel::Debug));

    klog_info!("heap grew by {} bytes", 64);
    klog_trace!("filtered out");
    klog_set_level(KlogLevel::Trace);
    klog_trace!("now visible");
    klog_set_level(KlogLevel::Error);
    klog_warn!("filtered again");
    klog_init();

    // Other tests may register services (which logs) while this one runs.
    let text = String::from_utf8(CAPTURE.bytes.lock().clone()).unwrap();
    let first = text.find("heap grew by 64 bytes\n").unwrap();
    let second = text.find("now visible\n").unwrap();
    assert!(first < second);
    assert!(!text.contains("dropped before any sink"));
    assert!(!text.contains("filtered"));
}

#[test]
fn align_helpers() {
    assert_eq!(align_up_usize(13, 8), Some(16));
    assert_eq!(align_up_usize(16, 8), Some(16));
    assert_eq!(align_up_usize(5, 0), Some(5));
    assert_eq!(align_up_usize(usize::MAX - 2, 8), None);
    assert_eq!(align_down_usize(13, 8), 8);
    assert_eq!(align_down_usize(13, 0), 13);
}

trait Greeter: Sync {
    fn greet(&self) -> &'static str;
}

struct Hello;

impl Greeter for Hello {
    fn greet(&self) -> &'static str {
        "hello"
    }
}

static HELLO: Hello = Hello;

#[test]
fn service_cell_holds_trait_objects() {
    let cell: ServiceCell<dyn Greeter> = ServiceCell::new("greeter");
    assert!(!cell.is_initialized());
    assert!(cell.try_get().is_none());
    cell.register(&HELLO);
    assert!(cell.is_initialized());
    assert_eq!(cell.get().greet(), "hello");
    assert_eq!(cell.name(), "greeter");
}

#[test]
#[should_panic(expected = "greeter already registered")]
fn service_cell_rejects_second_registration() {
    let cell: ServiceCell<dyn Greeter> = ServiceCell::new("greeter");
    cell.register(&HELLO);
    cell.register(&HELLO);
}

#[test]
#[should_panic(expected = "greeter not initialized")]
fn service_cell_get_before_register_panics() {
    let cell: ServiceCell<dyn Greeter> = ServiceCell::new("greeter");
    let _ = cell.get();
}

mod generated {
    crate::define_service! {
        counter => CounterServices {
            next(step: u32) -> u32;
            @no_wrapper reset();
        }
    }

    fn next_impl(step: u32) -> u32 {
        step + 1
    }

    fn reset_impl() {}

    pub static TABLE: CounterServices = CounterServices {
        next: next_impl,
        reset: reset_impl,
    };
}

#[test]
fn define_service_generates_registration_and_wrappers() {
    assert!(!generated::is_counter_initialized());
    assert!(generated::try_counter_services().is_none());
    generated::register_counter_services(&generated::TABLE);
    assert!(generated::is_counter_initialized());
    assert_eq!(generated::next(41), 42);
    (generated::counter_services().reset)();
}
