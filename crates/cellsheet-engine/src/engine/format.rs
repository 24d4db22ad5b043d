/// Render a computed number as cell value text.
///
/// Whole numbers print without a fractional part; everything else uses the
/// shortest representation that reads back to the same value.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        // Avoid "-0".
        format!("{:.0}", if n == 0.0 { 0.0 } else { n })
    } else {
        n.to_string()
    }
}

/// Format a number for a fixed-width display column.
pub fn format_display(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", if n == 0.0 { 0.0 } else { n })
    } else {
        format!("{:.2}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(8.0), "8");
        assert_eq!(format_number(-13.0), "-13");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(f64::NAN), "#NAN!");
        assert_eq!(format_number(f64::INFINITY), "#INF!");
    }

    #[test]
    fn test_format_display() {
        assert_eq!(format_display(1.0 / 3.0), "0.33");
        assert_eq!(format_display(42.0), "42");
    }
}
