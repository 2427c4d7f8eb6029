pub trait NumExt {
    /// Returns the largest power of two that is smaller than or equal to the number. Returns
    /// 1 for 0.
    fn prev_power_of_two(self) -> Self;

    /// Integer division rounding up.
    fn div_ceil_ext(self, rhs: Self) -> Self;
}

impl NumExt for usize {
    #[inline]
    fn prev_power_of_two(self) -> Self {
        match self {
            0 | 1 => 1,
            n => 1 << (Self::BITS - 1 - n.leading_zeros()),
        }
    }

    #[inline]
    fn div_ceil_ext(self, rhs: Self) -> Self {
        (self + rhs - 1) / rhs
    }
}

/// Returns the label of the group at `index`: `A`..`Z`, then `AA`, `AB` and so on.
pub fn group_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;

    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }

    label.reverse();
    // Only ASCII letters are pushed.
    String::from_utf8(label).unwrap_or_default()
}
