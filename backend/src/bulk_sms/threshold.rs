use super::SkipReason;

/// The attendance cutoff chosen by the uploader.
///
/// A row is notified only when its attendance is strictly below the cutoff;
/// a value equal to the cutoff is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceFilter {
    Below50,
    Below65,
    Below75,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown attendance filter '{0}', expected one of <50, <65, <75")]
pub struct UnknownFilter(pub String);

impl AttendanceFilter {
    /// Parses the form value. Blank, `all` and `none` mean "no filtering".
    pub fn parse(value: Option<&str>) -> Result<Option<Self>, UnknownFilter> {
        let Some(raw) = value.map(str::trim) else {
            return Ok(None);
        };
        match raw {
            "" | "all" | "none" => Ok(None),
            "<50" => Ok(Some(AttendanceFilter::Below50)),
            "<65" => Ok(Some(AttendanceFilter::Below65)),
            "<75" => Ok(Some(AttendanceFilter::Below75)),
            other => Err(UnknownFilter(other.to_string())),
        }
    }

    pub fn cutoff(&self) -> u32 {
        match self {
            AttendanceFilter::Below50 => 50,
            AttendanceFilter::Below65 => 65,
            AttendanceFilter::Below75 => 75,
        }
    }
}

/// Decides whether a row with `attendance` should go on to dispatch.
pub fn check(filter: Option<AttendanceFilter>, attendance: f64) -> Result<(), SkipReason> {
    match filter {
        Some(f) if attendance >= f64::from(f.cutoff()) => Err(SkipReason::new(format!(
            "Attendance >= {}%",
            f.cutoff()
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_closed_set() {
        assert_eq!(AttendanceFilter::parse(None).unwrap(), None);
        assert_eq!(AttendanceFilter::parse(Some("")).unwrap(), None);
        assert_eq!(AttendanceFilter::parse(Some("all")).unwrap(), None);
        assert_eq!(
            AttendanceFilter::parse(Some("<50")).unwrap(),
            Some(AttendanceFilter::Below50)
        );
        assert_eq!(
            AttendanceFilter::parse(Some(" <65 ")).unwrap(),
            Some(AttendanceFilter::Below65)
        );
        assert_eq!(
            AttendanceFilter::parse(Some("<75")).unwrap(),
            Some(AttendanceFilter::Below75)
        );
        assert!(AttendanceFilter::parse(Some("<80")).is_err());
    }

    #[test]
    fn cutoff_value_is_skipped() {
        for f in [
            AttendanceFilter::Below50,
            AttendanceFilter::Below65,
            AttendanceFilter::Below75,
        ] {
            let c = f64::from(f.cutoff());
            assert!(check(Some(f), c).is_err(), "{:?} at cutoff must skip", f);
            assert!(check(Some(f), c - 0.01).is_ok());
            assert!(check(Some(f), c + 10.0).is_err());
            assert!(check(Some(f), 0.0).is_ok());
        }
    }

    #[test]
    fn no_filter_lets_everything_through() {
        for a in [0.0, 49.9, 75.0, 100.0] {
            assert!(check(None, a).is_ok());
        }
    }

    #[test]
    fn skip_reason_names_the_cutoff() {
        let reason = check(Some(AttendanceFilter::Below75), 80.0).unwrap_err();
        assert_eq!(reason.to_string(), "Attendance >= 75%");
    }
}
