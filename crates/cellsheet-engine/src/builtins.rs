//! Built-in range functions and their metadata.
//!
//! Conventions:
//! - Formula-facing names are ALL CAPS (e.g. `SUM`, `AVER`).
//! - Each built-in also has the name spreadsheet interchange files use
//!   (e.g. `AVER` is written as `AVERAGE`).
//! - If you add a new range function, update `RANGE_BUILTINS` and the
//!   `aggregate` match below.

pub struct RangeBuiltin {
    pub function: RangeFunction,
    pub sheet_name: &'static str,
    pub interchange_name: &'static str,
    pub description: &'static str,
}

pub const RANGE_BUILTINS: &[RangeBuiltin] = &[
    RangeBuiltin {
        function: RangeFunction::Sum,
        sheet_name: "SUM",
        interchange_name: "SUM",
        description: "Sum of numeric values in a range",
    },
    RangeBuiltin {
        function: RangeFunction::Aver,
        sheet_name: "AVER",
        interchange_name: "AVERAGE",
        description: "Mean of numeric values in a range",
    },
    RangeBuiltin {
        function: RangeFunction::Max,
        sheet_name: "MAX",
        interchange_name: "MAX",
        description: "Largest numeric value in a range",
    },
    RangeBuiltin {
        function: RangeFunction::Min,
        sheet_name: "MIN",
        interchange_name: "MIN",
        description: "Smallest numeric value in a range",
    },
    RangeBuiltin {
        function: RangeFunction::StdDev,
        sheet_name: "STDDEV",
        interchange_name: "STDEV",
        description: "Population standard deviation of numeric values in a range",
    },
];

/// Name of the copy-only function accepted by the broadcast command.
pub const COPY_FUNCTION: &str = "CPY";

/// An aggregate over a one-dimensional range of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeFunction {
    Sum,
    Aver,
    Max,
    Min,
    StdDev,
}

impl RangeFunction {
    fn builtin(self) -> &'static RangeBuiltin {
        RANGE_BUILTINS
            .iter()
            .find(|b| b.function == self)
            .unwrap_or(&RANGE_BUILTINS[0])
    }

    /// Look up a function by its formula name (exact, uppercase).
    pub fn from_name(name: &str) -> Option<RangeFunction> {
        RANGE_BUILTINS
            .iter()
            .find(|b| b.sheet_name == name)
            .map(|b| b.function)
    }

    /// Look up a function by its interchange name (case-insensitive).
    pub fn from_interchange_name(name: &str) -> Option<RangeFunction> {
        RANGE_BUILTINS
            .iter()
            .find(|b| b.interchange_name.eq_ignore_ascii_case(name))
            .map(|b| b.function)
    }

    pub fn name(self) -> &'static str {
        self.builtin().sheet_name
    }

    pub fn interchange_name(self) -> &'static str {
        self.builtin().interchange_name
    }

    /// Aggregate the qualifying (numeric) values of a range, in range order.
    ///
    /// Non-numeric cells never reach this point, so the AVER and STDDEV
    /// denominators are the qualifying count rather than the range length.
    pub fn aggregate(self, values: &[f64]) -> f64 {
        match self {
            RangeFunction::Sum => values.iter().sum(),
            RangeFunction::Aver => mean(values),
            RangeFunction::Max => values
                .split_first()
                .map(|(first, rest)| rest.iter().fold(*first, |acc, v| if *v > acc { *v } else { acc }))
                .unwrap_or(0.0),
            RangeFunction::Min => values
                .split_first()
                .map(|(first, rest)| rest.iter().fold(*first, |acc, v| if *v < acc { *v } else { acc }))
                .unwrap_or(0.0),
            RangeFunction::StdDev => {
                let mean = mean(values);
                let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
                (squares / values.len() as f64).sqrt()
            }
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_mapping() {
        assert_eq!(RangeFunction::from_name("SUM"), Some(RangeFunction::Sum));
        assert_eq!(RangeFunction::from_name("STDDEV"), Some(RangeFunction::StdDev));
        assert_eq!(RangeFunction::from_name("sum"), None);
        assert_eq!(RangeFunction::from_name("AVERAGE"), None);
        assert_eq!(RangeFunction::from_name(COPY_FUNCTION), None);
    }

    #[test]
    fn test_interchange_mapping() {
        assert_eq!(RangeFunction::Aver.interchange_name(), "AVERAGE");
        assert_eq!(RangeFunction::StdDev.interchange_name(), "STDEV");
        assert_eq!(
            RangeFunction::from_interchange_name("average"),
            Some(RangeFunction::Aver)
        );
        assert_eq!(RangeFunction::from_interchange_name("AVER"), None);
    }

    #[test]
    fn test_aggregates() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(RangeFunction::Sum.aggregate(&values), 40.0);
        assert_eq!(RangeFunction::Aver.aggregate(&values), 5.0);
        assert_eq!(RangeFunction::Max.aggregate(&values), 9.0);
        assert_eq!(RangeFunction::Min.aggregate(&values), 2.0);
        assert_eq!(RangeFunction::StdDev.aggregate(&values), 2.0);
    }

    #[test]
    fn test_aggregates_over_nothing() {
        assert_eq!(RangeFunction::Sum.aggregate(&[]), 0.0);
        assert_eq!(RangeFunction::Max.aggregate(&[]), 0.0);
        assert_eq!(RangeFunction::Min.aggregate(&[]), 0.0);
        assert!(RangeFunction::Aver.aggregate(&[]).is_nan());
        assert!(RangeFunction::StdDev.aggregate(&[]).is_nan());
    }

    #[test]
    fn test_max_keeps_first_of_equal_values() {
        assert_eq!(RangeFunction::Max.aggregate(&[-3.0, -1.0, -2.0]), -1.0);
        assert_eq!(RangeFunction::Min.aggregate(&[3.0, 1.0, 2.0]), 1.0);
    }
}
