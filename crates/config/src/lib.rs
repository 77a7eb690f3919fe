//! Toolchain configuration
//!
//! Typed, eagerly validated configuration for a smart-contract toolchain: the
//! exact compiler release to invoke and the network profiles its client can
//! reach. Sources are JSON or TOML records of the shape
//!
//! ```json
//! {
//!   "compilerVersion": "0.8.18",
//!   "networks": {
//!     "hardhat": {},
//!     "localhost": { "url": "http://127.0.0.1:8545" }
//!   }
//! }
//! ```

pub mod descriptor;
pub mod error;
pub mod network;
pub mod shared;
mod source;
pub mod version;

pub use descriptor::{ConfigDescriptor, Optimizer, ProjectPaths, CONFIG_FILE_NAMES};
pub use error::ConfigError;
pub use network::{GasSetting, NetworkParameters, DEFAULT_NETWORK};
pub use version::parse_compiler_version;
