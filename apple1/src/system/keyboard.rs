//! Apple 1 keyboard adapter.
//!
//! The Apple 1 keyboard is an ASCII encoder wired to PIA port A. Bit 7 of
//! the port is tied high, so the monitor sees characters in the range
//! $A0-$DF. Each key press is presented as a CA1 strobe: the character is
//! latched on the port pins, CA1 is raised and then lowered again, with a
//! PIA tick after each transition so the edge detector sees the pulse.
//!
//! The keyboard only produces uppercase. Host lowercase letters are folded.

use crate::devices::Pia6820;

/// Bit 7 of port A is always high on the Apple 1.
pub const KEY_STROBE_BIT: u8 = 0x80;

/// Apple 1 code for the Return key.
pub const KEY_RETURN: u8 = 0x0D;

/// Apple 1 code for the rubout key. The monitor treats `_` as backspace.
pub const KEY_RUBOUT: u8 = 0x5F;

/// Apple 1 code for Escape.
pub const KEY_ESCAPE: u8 = 0x1B;

/// Translates a host key name into the 7-bit code the keyboard produces.
///
/// Accepts single printable characters (lowercase is folded to uppercase)
/// and the names `Enter`, `Backspace`, `Escape` and `Space`. Anything the
/// Apple 1 keyboard cannot produce returns `None`.
///
/// # Examples
///
/// ```
/// use apple1::system::keyboard::map_host_key;
///
/// assert_eq!(map_host_key("a"), Some(b'A'));
/// assert_eq!(map_host_key("Enter"), Some(0x0D));
/// assert_eq!(map_host_key("F1"), None);
/// ```
pub fn map_host_key(key: &str) -> Option<u8> {
    match key {
        "Enter" | "Return" => return Some(KEY_RETURN),
        "Backspace" | "Delete" => return Some(KEY_RUBOUT),
        "Escape" | "Esc" => return Some(KEY_ESCAPE),
        "Space" => return Some(b' '),
        _ => {}
    }

    let mut chars = key.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        return None;
    };
    if !ch.is_ascii() {
        return None;
    }
    let code = ch.to_ascii_uppercase() as u8;
    (0x20..=0x5F).contains(&code).then_some(code)
}

/// Presses `key`. Returns `false` for keys the Apple 1 keyboard does not
/// have; nothing reaches the PIA in that case.
pub fn key_down(pia: &mut Pia6820, key: &str) -> bool {
    match map_host_key(key) {
        Some(code) => {
            strobe(pia, code);
            true
        }
        None => false,
    }
}

/// Delivers a raw 7-bit code with a CA1 pulse.
pub fn strobe(pia: &mut Pia6820, code: u8) {
    pia.set_input_a(code | KEY_STROBE_BIT);
    pia.set_ca1(true);
    pia.tick();
    pia.set_ca1(false);
    pia.tick();
}
