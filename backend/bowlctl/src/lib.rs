//! # bowlctl
//!
//! Command line access to the bowl engine, mostly for checking catalogs and poking at share links
//! without a browser.
//!
//! ```sh
//! bowlctl --catalog data/restaurants.json check
//! bowlctl encode --menu harvest --limit sodium_mg=500 --portion brown-rice=1 --portion tofu=2
//! bowlctl decode <token>
//! bowlctl totals <token>
//! ```
//!
//! Every command returns the text to print. Rejected portions while encoding are reported on
//! stderr and skipped, the same way the frontend refuses a click.
use std::{fmt::Write, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use bowl::{
    Bowl, Catalog, Nutrient, Portion, Verdict, decode as decode_token, encode as encode_token,
    load_catalog, reconcile, status, validate::display_value,
};
use serde_json::json;

pub fn load(path: &Path) -> Result<Catalog> {
    load_catalog(path).with_context(|| format!("Loading catalog {}", path.display()))
}

pub fn parse_pair(input: &str) -> Result<(String, String), String> {
    input
        .split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got {input}"))
}

pub fn check(catalog: &Catalog) -> Result<String> {
    let mut report = String::new();

    for menu in &catalog.menus {
        writeln!(
            report,
            "{} ({}): {} categories, {} ingredients",
            menu.id,
            menu.name,
            menu.categories.len(),
            menu.ingredients().count()
        )?;
    }

    let issues = catalog.lint();
    if issues.is_empty() {
        write!(report, "No issues found.")?;
    } else {
        write!(report, "{} issues:", issues.len())?;
        for issue in issues {
            write!(report, "\n  {issue}")?;
        }
    }

    Ok(report)
}

pub fn decode(catalog: &Catalog, token: &str) -> Result<String> {
    let mut bowl = Bowl::new(catalog)?;

    let (restored, reconciliation) = match decode_token(token) {
        Some(shared) => (true, reconcile(&mut bowl, catalog, shared)),
        None => (false, Default::default()),
    };

    let output = json!({
        "restored": restored,
        "bowl": bowl,
        "totals": bowl.totals(catalog),
        "compliant": !bowl.violates(&bowl.totals(catalog)),
        "discarded": reconciliation.discarded,
    });

    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn encode(
    catalog: &Catalog,
    menu: Option<&str>,
    strict: bool,
    limits: &[(String, String)],
    portions: &[(String, String)],
) -> Result<String> {
    let mut bowl = Bowl::new(catalog)?;

    if let Some(menu) = menu {
        if !bowl.select_menu(catalog, menu) {
            bail!("Unknown menu {menu}");
        }
    }

    for (key, value) in limits {
        let nutrient = Nutrient::from_key(key).ok_or_else(|| anyhow!("Unknown nutrient {key}"))?;
        bowl.set_constraint_input(nutrient, value);
    }

    bowl.set_strict_min(strict);

    for (ingredient, value) in portions {
        let portion = value
            .parse()
            .ok()
            .and_then(Portion::from_factor)
            .ok_or_else(|| anyhow!("Invalid portion {value} for {ingredient}"))?;

        match bowl.set_portion(catalog, ingredient, portion) {
            Verdict::Rejected(reason) => eprintln!("Skipping {ingredient}={value}: {reason}"),
            Verdict::Ignored => eprintln!("Skipping {ingredient}: not on menu {}", bowl.menu_id),
            Verdict::Applied | Verdict::Unchanged => {}
        }
    }

    Ok(encode_token(&bowl))
}

pub fn totals(catalog: &Catalog, token: &str) -> Result<String> {
    let (bowl, _) = bowl::restore(catalog, Some(token))?;
    let totals = bowl.totals(catalog);

    let mut report = format!("Menu: {}", bowl.menu_id);
    if bowl.strict_min {
        report.push_str(" (strict minimums)");
    }

    for line in status(&totals, &bowl.constraints) {
        let unit = line.nutrient.unit();
        write!(
            report,
            "\n{:<14} {:>6} / {:<6} {:<3} {} {}",
            line.label,
            display_value(line.total, unit),
            display_value(line.limit, unit),
            line.direction,
            if line.pass { "Pass" } else { "Fail" },
            line.remaining
        )?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    const CATALOG: &str = r#"{"menus": [
        {"id": "harvest", "name": "Harvest Bowls", "categories": [
            {"id": "base", "label": "Base", "ingredients": [
                {"id": "brown-rice", "name": "Brown Rice", "calories": 220, "fiber_g": 3},
                {"id": "kale", "name": "Kale", "calories": 30, "fiber_g": 4, "sodium_mg": 40}
            ]},
            {"id": "proteins", "label": "Proteins", "ingredients": [
                {"id": "tofu", "name": "Tofu", "calories": 180, "protein_g": 18, "sodium_mg": 300}
            ]}
        ]},
        {"id": "poke", "name": "Poke House", "categories": []}
    ]}"#;

    fn catalog() -> Catalog {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        load(file.path()).unwrap()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("rice = 0.5").unwrap(), pair("rice", "0.5"));
        assert!(parse_pair("rice").is_err());
        assert!(parse_pair("=2").is_err());
    }

    #[test]
    fn test_missing_catalog() {
        let error = load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(format!("{error:#}").contains("Loading catalog"));
    }

    #[test]
    fn test_check() {
        let report = check(&catalog()).unwrap();

        assert!(report.contains("harvest (Harvest Bowls): 2 categories, 3 ingredients"));
        assert!(report.ends_with("No issues found."));
    }

    #[test]
    fn test_encode_then_decode() {
        let catalog = catalog();
        let token = encode(
            &catalog,
            Some("harvest"),
            false,
            &[pair("sodium_mg", "500")],
            &[pair("brown-rice", "1"), pair("tofu", "2"), pair("kale", "0.5")],
        )
        .unwrap();

        let output: serde_json::Value = serde_json::from_str(&decode(&catalog, &token).unwrap()).unwrap();

        assert_eq!(output["restored"], true);
        assert_eq!(output["bowl"]["menu_id"], "harvest");
        assert_eq!(output["bowl"]["constraints"]["sodium_mg"], 500.0);
        // two servings of tofu would put sodium at 600
        assert_eq!(
            output["bowl"]["portions"],
            json!({"brown-rice": 1, "kale": 0.5})
        );
        assert_eq!(output["compliant"], true);
    }

    #[test]
    fn test_encode_errors() {
        let catalog = catalog();

        assert!(encode(&catalog, Some("closed"), false, &[], &[]).is_err());
        assert!(encode(&catalog, None, false, &[pair("vitamin_c", "5")], &[]).is_err());
        assert!(encode(&catalog, None, false, &[], &[pair("kale", "3")]).is_err());
    }

    #[test]
    fn test_decode_garbage() {
        let output: serde_json::Value =
            serde_json::from_str(&decode(&catalog(), "not-a-token").unwrap()).unwrap();

        assert_eq!(output["restored"], false);
        assert_eq!(output["bowl"]["menu_id"], "harvest");
    }

    #[test]
    fn test_totals_report() {
        let catalog = catalog();
        let token = encode(&catalog, None, true, &[], &[]).unwrap();

        let report = totals(&catalog, &token).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "Menu: harvest (strict minimums)");
        assert_eq!(lines.len(), 9);
        assert!(lines[1].starts_with("Calories"));
        assert!(lines[1].contains("700 left"));
        assert!(lines[7].contains("Fail"));
        assert!(lines[7].contains("10 g needed"));
    }
}
