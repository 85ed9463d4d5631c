//! Functions implemented by the host and bound in the global frame.

use std::{
    rc::Rc,
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::debug;

use crate::errors::errors::ErrorImpl;

use super::{callable::NativeFunction, environment::SharedEnvironment, value::Value};

fn clock(_arguments: &[Value]) -> Result<Value, ErrorImpl> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|error| ErrorImpl::NativeFailure {
            message: error.to_string(),
        })?;

    Ok(Value::from(elapsed.as_secs_f64()))
}

pub const NATIVES: &[NativeFunction] = &[NativeFunction {
    name: "clock",
    arity: 0,
    function: clock,
}];

/// Binds every native function in `globals`.
pub fn register_natives(globals: &SharedEnvironment) {
    let mut globals = globals.borrow_mut();

    for native in NATIVES {
        globals.define(
            native.name,
            Value::Callable(Rc::new(NativeFunction {
                name: native.name,
                arity: native.arity,
                function: native.function,
            })),
        );
    }

    debug!(natives = NATIVES.len(), "registered natives");
}
