// Adapters layer: concrete hosts for the analyzer outside of a 3D viewer.

pub mod file_host;

pub use file_host::FileHost;
