//! Luhn check-digit arithmetic (ISO/IEC 7812).

/// Calculate the Luhn check digit for a base number string.
///
/// Iterates from the rightmost digit of the base, doubling every second
/// digit starting with that one and subtracting 9 from any doubled value
/// above 9. The check digit is `(sum * 9) % 10`; appending it to the base
/// yields a number whose full Luhn sum is a multiple of 10.
///
/// Non-digit characters contribute nothing to the sum, so callers are
/// expected to pass well-formed digit strings.
pub fn check_digit(base: &str) -> u8 {
    let mut sum = 0u32;
    let mut alternate = true;

    for ch in base.chars().rev() {
        let mut digit = ch.to_digit(10).unwrap_or(0);

        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }

    ((sum * 9) % 10) as u8
}

/// Standard Luhn validation of a complete number (check digit included).
pub fn is_valid(number: &str) -> bool {
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let mut sum = 0u32;
    // The check digit itself is not doubled; doubling starts one in from the end.
    let mut alternate = false;

    for ch in number.chars().rev() {
        let mut digit = ch.to_digit(10).unwrap_or(0);

        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }

    sum % 10 == 0
}
