use crate::domain::model::CartState;
use crate::utils::error::Result;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 5] = ["technology", "identifier", "title", "hours", "resource_locator"];

/// Writes the cart as CSV, one row per entry in cart order.
pub fn write_cart_csv<W: Write>(cart: &CartState, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for entry in cart {
        csv_writer.write_record([
            entry.technology.as_str(),
            entry.identifier.as_str(),
            entry.title.as_str(),
            entry.hours.to_string().as_str(),
            entry.resource_locator.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_cart_csv<P: AsRef<Path>>(cart: &CartState, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_cart_csv(cart, file)?;
    tracing::debug!("Exported {} cart entries to {}", cart.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CartEntry, Technology};
    use tempfile::TempDir;

    fn cart() -> CartState {
        let (cart, _) = CartState::from_entries(vec![
            CartEntry {
                technology: Technology::JavaScript,
                identifier: "Arrays".to_string(),
                title: "Arrays, Maps and Sets".to_string(),
                summary: "ignored".to_string(),
                resource_locator: "arrays.html".to_string(),
                hours: 6,
            },
            CartEntry {
                technology: Technology::React,
                identifier: "Hooks".to_string(),
                title: "Hooks".to_string(),
                summary: String::new(),
                resource_locator: "hooks.html".to_string(),
                hours: 5,
            },
        ]);
        cart
    }

    #[test]
    fn test_write_cart_csv() {
        let mut out = Vec::new();
        write_cart_csv(&cart(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "technology,identifier,title,hours,resource_locator");
        assert_eq!(lines[1], "javascript,Arrays,\"Arrays, Maps and Sets\",6,arrays.html");
        assert_eq!(lines[2], "react,Hooks,Hooks,5,hooks.html");
    }

    #[test]
    fn test_empty_cart_writes_header_only() {
        let mut out = Vec::new();
        write_cart_csv(&CartState::new(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "technology,identifier,title,hours,resource_locator\n"
        );
    }

    #[test]
    fn test_export_cart_csv_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plans").join("my-plan.csv");

        export_cart_csv(&cart(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][1], "Hooks");
    }
}
