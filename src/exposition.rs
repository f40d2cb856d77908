//! Prometheus text exposition rendering for rasdaemon families.
//!
//! Labels keep the column order of the family query, which the `prometheus`
//! crate's encoder would sort alphabetically, so these families are rendered
//! by hand.

use std::fmt::Write as FmtWrite;

use crate::db::FamilySnapshot;

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders all snapshots in order.
///
/// A family without samples still produces its `# HELP`/`# TYPE` header and a
/// single unlabeled `<name> 0` line.
pub fn render(snapshots: &[FamilySnapshot]) -> String {
    let mut out = String::with_capacity(256 * snapshots.len().max(1));

    for snapshot in snapshots {
        let family = snapshot.family;
        writeln!(out, "# HELP {} {}", family.name, escape_help(family.help)).ok();
        writeln!(out, "# TYPE {} {}", family.name, family.kind).ok();

        if snapshot.samples.is_empty() {
            writeln!(out, "{} 0", family.name).ok();
            continue;
        }

        for sample in &snapshot.samples {
            out.push_str(family.name);
            if !sample.labels.is_empty() {
                out.push('{');
                for (idx, (name, value)) in sample.labels.iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    write!(out, "{}=\"{}\"", name, escape_label_value(value)).ok();
                }
                out.push('}');
            }
            writeln!(out, " {}", sample.value).ok();
        }
    }

    out
}

/// Escapes `\`, `"` and newlines in a label value.
pub fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Formats a sample value; integral values print without a fraction.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let inf = if value > 0.0 { "+Inf" } else { "-Inf" };
        inf.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Sample, SampleValue};
    use crate::families::{MetricFamily, MetricKind, MC_EVENTS};

    fn labels(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_family_renders_zero_line() {
        let snapshot = FamilySnapshot {
            family: &MC_EVENTS,
            samples: Vec::new(),
        };

        let out = render(&[snapshot]);
        assert_eq!(
            out,
            "# HELP rasdaemon_mc_events_total Memory controller errors\n\
             # TYPE rasdaemon_mc_events_total counter\n\
             rasdaemon_mc_events_total 0\n"
        );
    }

    #[test]
    fn test_labels_in_column_order() {
        let snapshot = FamilySnapshot {
            family: &MC_EVENTS,
            samples: vec![Sample {
                labels: labels(&[
                    ("mc", "0"),
                    ("top_layer", "1"),
                    ("middle_layer", "-1"),
                    ("lower_layer", "-1"),
                    ("err_type", "CE"),
                ]),
                value: SampleValue::Integer(5),
            }],
        };

        let out = render(&[snapshot]);
        assert!(out.contains(
            "rasdaemon_mc_events_total{mc=\"0\",top_layer=\"1\",middle_layer=\"-1\",lower_layer=\"-1\",err_type=\"CE\"} 5\n"
        ));
        assert!(!out.contains("rasdaemon_mc_events_total 0"));
    }

    #[test]
    fn test_sample_without_labels() {
        let snapshot = FamilySnapshot {
            family: &MC_EVENTS,
            samples: vec![Sample {
                labels: Vec::new(),
                value: SampleValue::Integer(3),
            }],
        };

        let out = render(&[snapshot]);
        assert!(out.ends_with("rasdaemon_mc_events_total 3\n"));
    }

    #[test]
    fn test_gauge_family_with_float_value() {
        static TEMPERATURE: MetricFamily = MetricFamily {
            name: "rasdaemon_test_temperature",
            help: "Test gauge",
            kind: MetricKind::Gauge,
            query: "SELECT 1 AS value",
            value_column: "value",
        };
        let snapshot = FamilySnapshot {
            family: &TEMPERATURE,
            samples: vec![Sample {
                labels: labels(&[("sensor", "dimm0")]),
                value: SampleValue::Float(41.5),
            }],
        };

        let out = render(&[snapshot]);
        assert!(out.contains("# TYPE rasdaemon_test_temperature gauge\n"));
        assert!(out.contains("rasdaemon_test_temperature{sensor=\"dimm0\"} 41.5\n"));
    }

    #[test]
    fn test_escape_label_value() {
        assert_eq!(escape_label_value("plain"), "plain");
        assert_eq!(escape_label_value("a\"b"), "a\\\"b");
        assert_eq!(escape_label_value("a\\b"), "a\\\\b");
        assert_eq!(escape_label_value("line1\nline2"), "line1\\nline2");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(5.0), "5");
        assert_eq!(format_value(-1.0), "-1");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
    }
}
