// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Simple macro to create a [`Result`] with an [`Ok`] variant. It is just syntactic sugar
/// that helps having to write `Ok(())`.
/// - If no arg is passed in then it will return `Ok(())`.
/// - If an arg is passed in then it will return `Ok($arg)`.
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}

/// Like [`format!`] but writes into a stack allocated [`crate::InlineString`]. Used for
/// the short status messages the reader shows below the prompt.
#[macro_export]
macro_rules! inline_string {
    ($($format:tt)*) => {{
        use std::fmt::Write;
        let mut acc = $crate::InlineString::new();
        // Writing into a string can't fail.
        write!(&mut acc, $($format)*).ok();
        acc
    }};
}

/// Run the block only when the given flag is `true`. The flags are `const` so the
/// compiler drops the block entirely when debugging is switched off.
#[macro_export]
macro_rules! call_if_true {
    ($cond:expr, $block:expr) => {{
        if $cond {
            $block
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_ok_macro() {
        fn unit() -> Result<(), ()> { ok!() }
        fn value() -> Result<u8, ()> { ok!(42) }
        assert_eq!(unit(), Ok(()));
        assert_eq!(value(), Ok(42));
    }

    #[test]
    fn test_inline_string_macro() {
        let count = 3;
        let it = inline_string!("{count} possibilities");
        assert_eq!(it.as_str(), "3 possibilities");
    }
}
