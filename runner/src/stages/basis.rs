//! Atomic attribute menu: basis sets and core potentials.

use super::numeric_capture;
use crate::{params::Params, prompts::Prompts, Error, Result};
use predefine::{log::LogWriter, Session};
use serde_json::{Map, Value};

/// Assign basis sets per group and verify the outcome.
pub(crate) fn run<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
    params: &Params<'_>,
) -> Result<()> {
    let menu = &prompts.basis;

    session.expect(&menu.headline)?;
    session.expect(&menu.goback)?;

    let config = match params.get("basis_set") {
        Some(config) => config,
        None => {
            // keep the program's own default assignments
            tracing::info!("using default basis sets");
            session.send_line("*")?;
            return Ok(());
        }
    };
    let groups = spread_groups(config)?;
    if groups.is_empty() {
        return Err(Error::EmptyGroup("basis_set".to_string()));
    }

    for (label, name) in ordered_groups(&groups)? {
        let group = format_group(label);
        tracing::debug!(group = %group, basis = %name, "assign basis");
        session.send_line(&format!("b {} {}", group, name))?;

        let outcome =
            session.expect_any(&[&menu.not_catalogued, &menu.goback])?;
        if outcome.index() == 0 {
            let catalog =
                outcome.group(1).unwrap_or_default().trim().to_string();
            let nickname =
                outcome.group(2).unwrap_or_default().trim().to_string();
            return Err(Error::InvalidBasis { nickname, catalog });
        }
    }

    if !params.bool_or("use_ecp", true) {
        session.send_line("ecprm all")?;
        let headline = session.expect(&menu.headline)?;
        let remaining = numeric_capture(&headline, 3)?;
        if remaining != 0 {
            return Err(Error::EcpRemoval(remaining));
        }
        session.expect(&menu.goback)?;
    }

    // an empty line redraws the menu with fresh counts
    session.send_line("")?;
    let headline = session.expect(&menu.headline)?;
    let atoms = numeric_capture(&headline, 1)?;
    let assigned = numeric_capture(&headline, 2)?;
    if atoms > assigned {
        return Err(Error::IncompleteBasis { atoms, assigned });
    }
    session.expect(&menu.goback)?;

    session.send_line("*")?;
    Ok(())
}

/// Expand the shorthand string form into a one-group mapping.
fn spread_groups(config: &Value) -> Result<Map<String, Value>> {
    match config {
        Value::String(name) => {
            let mut all = Map::new();
            all.insert("all".to_string(), Value::String(name.clone()));
            Ok(all)
        }
        Value::Object(map) => Ok(map.clone()),
        other => Err(Error::Schema {
            path: "basis_set".to_string(),
            expected: "a string or a mapping".to_string(),
            actual: crate::params::value_kind(other).to_string(),
        }),
    }
}

/// Group labels with their basis names, broad assignments first.
///
/// `all` sorts before element labels, element labels before index
/// groups, so a blanket assignment never overwrites a specific one.
/// Ties keep a stable lexicographic order.
fn ordered_groups(groups: &Map<String, Value>) -> Result<Vec<(&str, &str)>> {
    let mut entries = Vec::with_capacity(groups.len());
    for (label, value) in groups {
        let name = value.as_str().ok_or_else(|| Error::Schema {
            path: format!("basis_set.{}", label),
            expected: "a string".to_string(),
            actual: crate::params::value_kind(value).to_string(),
        })?;
        entries.push((label.as_str(), name));
    }
    entries.sort_by(|(a, _), (b, _)| {
        group_rank(a).cmp(&group_rank(b)).then_with(|| a.cmp(b))
    });
    Ok(entries)
}

/// Rank deciding assignment order: broad before narrow.
fn group_rank(label: &str) -> u8 {
    if label == "all" {
        0
    } else if label.chars().all(|c| c.is_ascii_alphabetic()) {
        1
    } else {
        2
    }
}

/// Menu-ready form of one group label.
///
/// One- and two-letter alphabetic labels address elements; the menu
/// wants them lowercase and quoted.
fn format_group(label: &str) -> String {
    if is_element_label(label) {
        format!("\"{}\"", label.to_ascii_lowercase())
    } else {
        label.to_string()
    }
}

fn is_element_label(label: &str) -> bool {
    label != "all"
        && !label.is_empty()
        && label.len() <= 2
        && label.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn labels(config: &Value) -> Vec<String> {
        let groups = spread_groups(config).unwrap();
        ordered_groups(&groups)
            .unwrap()
            .into_iter()
            .map(|(label, _)| label.to_string())
            .collect()
    }

    #[test]
    fn broad_groups_come_first() {
        let config = json!({
            "3": "sto-3g",
            "Fe": "def2-TZVP",
            "all": "def2-SVP",
            "C": "def2-SVP",
        });
        assert_eq!(labels(&config), ["all", "C", "Fe", "3"]);
    }

    #[test]
    fn string_shorthand_becomes_a_blanket_group() {
        let config = json!("def2-SVP");
        assert_eq!(labels(&config), ["all"]);
    }

    #[test]
    fn element_labels_are_quoted_lowercase() {
        assert_eq!(format_group("Fe"), "\"fe\"");
        assert_eq!(format_group("H"), "\"h\"");
        assert_eq!(format_group("all"), "all");
        assert_eq!(format_group("3"), "3");
        assert_eq!(format_group("1,2,4-6"), "1,2,4-6");
        assert_eq!(format_group("lanthanides"), "lanthanides");
    }

    #[test]
    fn non_string_basis_names_are_rejected() {
        let groups = spread_groups(&json!({ "all": 17 })).unwrap();
        match ordered_groups(&groups) {
            Err(Error::Schema { path, .. }) => {
                assert_eq!(path, "basis_set.all");
            }
            r => panic!("should reject the integer {r:?}"),
        }
    }
}
