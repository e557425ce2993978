/// Binary sweep log reader and writer.
pub mod bin;
