//! Parser for the single-line per-process status record.
//!
//! The image name is delimited by the first `(` and the *last* `)` in the
//! line, because the name itself may contain spaces, digits, or `)`. What
//! follows the closing delimiter is a whitespace-separated sequence of
//! fixed-position fields; the positions live in [`fields`] so a kernel
//! schema drift is a one-place fix.

use crate::error::ProbeError;

/// Field positions after the closing `)`, zero-indexed.
///
/// Documented stat schema: state(0) ppid(1) pgrp(2) session(3) tty_nr(4)
/// tpgid(5) flags(6) minflt(7) cminflt(8) majflt(9) cmajflt(10) utime(11)
/// stime(12) cutime(13) cstime(14) priority(15) nice(16) num_threads(17)
/// itrealvalue(18) starttime(19) vsize(20) rss(21).
mod fields {
    pub const STATE: usize = 0;
    pub const PPID: usize = 1;
    pub const PGRP: usize = 2;
    pub const SESSION: usize = 3;
    pub const UTIME: usize = 11;
    pub const STIME: usize = 12;
    pub const CUTIME: usize = 13;
    pub const CSTIME: usize = 14;
    pub const STARTTIME: usize = 19;
    pub const VSIZE: usize = 20;
    pub const RSS: usize = 21;

    /// Minimum field count of a conforming line. Newer kernels append more
    /// fields; those are ignored.
    pub const REQUIRED: usize = RSS + 1;
}

/// Typed fields extracted from one stat line.
#[derive(Debug, PartialEq, Eq)]
pub struct StatFields {
    pub name: String,
    pub state: char,
    pub ppid: u32,
    pub pgrp: u32,
    pub session: u32,
    pub utime: u64,
    pub stime: u64,
    pub cutime: i64,
    pub cstime: i64,
    pub starttime: u64,
    pub vsize: u64,
    pub rss: u64,
}

/// Parse one stat line into its typed fields.
///
/// A line shorter than the schema is a hard error; missing fields are never
/// defaulted to zero.
pub fn parse(line: &str) -> Result<StatFields, ProbeError> {
    let open = line
        .find('(')
        .ok_or_else(|| ProbeError::MalformedStat("no opening name delimiter".into()))?;
    let close = line
        .rfind(')')
        .ok_or_else(|| ProbeError::MalformedStat("no closing name delimiter".into()))?;
    if close < open {
        return Err(ProbeError::MalformedStat(
            "name delimiters out of order".into(),
        ));
    }
    let name = line[open + 1..close].to_string();

    let tokens: Vec<&str> = line[close + 1..].split_whitespace().collect();
    if tokens.len() < fields::REQUIRED {
        return Err(ProbeError::MalformedStat(format!(
            "{} fields after the image name, schema requires {}",
            tokens.len(),
            fields::REQUIRED
        )));
    }

    let state_token = tokens[fields::STATE];
    let mut state_chars = state_token.chars();
    let state = match (state_chars.next(), state_chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(ProbeError::MalformedStat(format!(
                "state token `{state_token}` is not a single character"
            )));
        }
    };

    Ok(StatFields {
        name,
        state,
        ppid: numeric(tokens[fields::PPID], "ppid")?,
        pgrp: numeric(tokens[fields::PGRP], "pgrp")?,
        session: numeric(tokens[fields::SESSION], "session")?,
        utime: numeric(tokens[fields::UTIME], "utime")?,
        stime: numeric(tokens[fields::STIME], "stime")?,
        cutime: numeric(tokens[fields::CUTIME], "cutime")?,
        cstime: numeric(tokens[fields::CSTIME], "cstime")?,
        starttime: numeric(tokens[fields::STARTTIME], "starttime")?,
        vsize: numeric(tokens[fields::VSIZE], "vsize")?,
        rss: numeric(tokens[fields::RSS], "rss")?,
    })
}

fn numeric<T: std::str::FromStr>(token: &str, field: &'static str) -> Result<T, ProbeError> {
    token
        .parse()
        .map_err(|_| ProbeError::MalformedStat(format!("bad {field} token `{token}`")))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    // 22 fields after the name: utime=500 stime=300 cutime=10 cstime=5
    // starttime=8000 vsize=123456789 rss=620.
    fn sample_line(name: &str) -> String {
        format!(
            "1234 ({name}) S 1 1234 1234 0 -1 4194304 100 2 3 4 500 300 10 5 20 0 1 0 8000 123456789 620"
        )
    }

    #[test]
    fn extracts_name_with_embedded_space() {
        let fields = parse(&sample_line("my proc")).unwrap();
        assert_eq!(fields.name, "my proc");
        assert_eq!(fields.state, 'S');
        assert_eq!(fields.ppid, 1);
        assert_eq!(fields.pgrp, 1234);
        assert_eq!(fields.session, 1234);
        assert_eq!(fields.utime, 500);
        assert_eq!(fields.stime, 300);
        assert_eq!(fields.cutime, 10);
        assert_eq!(fields.cstime, 5);
        assert_eq!(fields.starttime, 8000);
        assert_eq!(fields.vsize, 123_456_789);
        assert_eq!(fields.rss, 620);
    }

    #[test]
    fn name_boundary_is_the_last_close_paren() {
        let fields = parse(&sample_line("weird)name")).unwrap();
        assert_eq!(fields.name, "weird)name");
        assert_eq!(fields.state, 'S');
    }

    #[test]
    fn name_may_contain_digits_and_open_parens() {
        let fields = parse(&sample_line("tmux: server (1)")).unwrap();
        assert_eq!(fields.name, "tmux: server (1)");
    }

    #[test]
    fn short_line_is_a_hard_error() {
        // Five fields fewer than the schema requires.
        let line = "1234 (short) S 1 1234 1234 0 -1 4194304 100 2 3 4 500 300 10 5 20 0";
        let err = parse(line).unwrap_err();
        assert!(matches!(err, ProbeError::MalformedStat(_)), "{err}");
    }

    #[test]
    fn trailing_extra_fields_are_ignored() {
        let line = format!("{} 0 0 0 17 1 0 0", sample_line("long"));
        let fields = parse(&line).unwrap();
        assert_eq!(fields.name, "long");
        assert_eq!(fields.rss, 620);
    }

    #[test]
    fn missing_delimiters_are_errors() {
        assert!(parse("1234 no-parens S 1").is_err());
        assert!(parse("1234 )backwards( S 1").is_err());
    }

    #[test]
    fn non_numeric_field_is_an_error() {
        let line = sample_line("ok").replace(" 8000 ", " notanumber ");
        let err = parse(&line).unwrap_err();
        assert!(matches!(err, ProbeError::MalformedStat(_)), "{err}");
    }

    proptest! {
        #[test]
        fn any_printable_name_roundtrips(name in "[A-Za-z0-9()_. :-]{1,16}") {
            let fields = parse(&sample_line(&name)).unwrap();
            prop_assert_eq!(fields.name, name);
            prop_assert_eq!(fields.utime, 500);
            prop_assert_eq!(fields.rss, 620);
        }

        #[test]
        fn parsing_is_deterministic(name in "[A-Za-z0-9() ]{1,16}") {
            let line = sample_line(&name);
            prop_assert_eq!(parse(&line).unwrap(), parse(&line).unwrap());
        }
    }
}
