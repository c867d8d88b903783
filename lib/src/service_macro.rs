//! Declarative macro for late-bound runtime hooks.
//!
//! [`define_service!`] turns a list of signatures into a table of function
//! pointers stored in a [`ServiceCell`](crate::ServiceCell). The runtime
//! calls through the generated wrappers; a target registers the table at
//! startup. This is how a host plugs in things the runtime cannot know on
//! its own, such as how to find the current thread's context handle.
//!
//! ```rust,ignore
//! use gloss_lib::define_service;
//!
//! define_service! {
//!     clock => ClockServices {
//!         now_micros() -> u64;
//!         @no_wrapper raw_ticks(out: *mut u64) -> i32;
//!     }
//! }
//! ```
//!
//! generates:
//! - `pub struct ClockServices { ... }` - the table
//! - `pub fn register_clock_services(...)` - registration, panics on the second call
//! - `pub fn is_clock_initialized() -> bool`
//! - `pub fn clock_services() -> &'static ClockServices` - panics if unregistered
//! - `pub fn try_clock_services() -> Option<&'static ClockServices>`
//! - one wrapper per method (unless `@no_wrapper`)

#[macro_export]
macro_rules! define_service {
    (
        $(#[$svc_meta:meta])*
        $svc_name:ident => $struct_name:ident {
            $(
                $(#[$method_meta:meta])*
                $(@$attr:ident)?
                $method_name:ident($($arg_name:ident : $arg_ty:ty),* $(,)?) $(-> $ret_ty:ty)?
            );* $(;)?
        }
    ) => {
        $(#[$svc_meta])*
        pub struct $struct_name {
            $(
                $(#[$method_meta])*
                pub $method_name: fn($($arg_ty),*) $(-> $ret_ty)?,
            )*
        }

        $crate::define_service!(@storage $svc_name, $struct_name);
        $crate::define_service!(@accessors $svc_name, $struct_name);

        $(
            $crate::define_service!(@wrapper
                $svc_name,
                $(@$attr)?
                $method_name($($arg_name : $arg_ty),*) $(-> $ret_ty)?
            );
        )*
    };

    (@storage $svc_name:ident, $struct_name:ident) => {
        $crate::paste::paste! {
            static [<$svc_name:upper _SERVICES>]: $crate::ServiceCell<$struct_name> =
                $crate::ServiceCell::new(stringify!($svc_name));
        }
    };

    (@accessors $svc_name:ident, $struct_name:ident) => {
        $crate::paste::paste! {
            pub fn [<register_ $svc_name _services>](services: &'static $struct_name) {
                [<$svc_name:upper _SERVICES>].register(services);
                $crate::klog_info!("{} services registered", stringify!($svc_name));
            }

            #[inline]
            pub fn [<is_ $svc_name _initialized>]() -> bool {
                [<$svc_name:upper _SERVICES>].is_initialized()
            }

            #[inline(always)]
            pub fn [<$svc_name _services>]() -> &'static $struct_name {
                [<$svc_name:upper _SERVICES>].get()
            }

            #[inline(always)]
            pub fn [<try_ $svc_name _services>]() -> Option<&'static $struct_name> {
                [<$svc_name:upper _SERVICES>].try_get()
            }
        }
    };

    (@wrapper $svc_name:ident, $method_name:ident($($arg_name:ident : $arg_ty:ty),*) $(-> $ret_ty:ty)?) => {
        $crate::paste::paste! {
            #[inline(always)]
            pub fn $method_name($($arg_name: $arg_ty),*) $(-> $ret_ty)? {
                ([<$svc_name _services>]().$method_name)($($arg_name),*)
            }
        }
    };

    (@wrapper $svc_name:ident, @no_wrapper $method_name:ident($($arg_name:ident : $arg_ty:ty),*) $(-> $ret_ty:ty)?) => {};
}
