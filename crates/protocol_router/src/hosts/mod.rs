//! Built-in host namespaces

pub mod clock;
pub mod guild;

use crate::error::Result;
use crate::table::RouteTableBuilder;

/// Register every built-in host
pub fn register_builtin(builder: &mut RouteTableBuilder) -> Result<()> {
    guild::register(builder)?;
    clock::register(builder)?;
    Ok(())
}
