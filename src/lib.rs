#![doc = include_str!("../README.md")]
#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod tree;

pub use tree::{Color, RbTree};

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        #[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
        pub mod config;
        mod error;
        #[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
        pub mod shell;

        pub use config::Config;
        pub use error::Error;
        pub use shell::Shell;
    }
}
