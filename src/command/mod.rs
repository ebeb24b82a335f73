//! The command sets of the supported controllers. Each command encodes to an opcode plus a
//! (possibly empty) argument payload; arguments outside the range the datasheet allows are
//! rejected with `Error::InvalidArgument` before anything is put on the bus.

macro_rules! ok_command {
    ($buf:ident, $cmd:expr, [$($arg:expr),*]) => {{
        #[allow(unused_mut)]
        let mut len = 0;
        $(
            $buf[len] = $arg;
            len += 1;
        )*
        Ok(($cmd, &$buf[..len]))
    }};
}

pub mod ssd1306;
pub mod st7735;
