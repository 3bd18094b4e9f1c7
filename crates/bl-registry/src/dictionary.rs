//! Field dictionary collaborator: target-system tables and fields.

use bl_core::entities::{DictionaryField, DictionaryTable};

/// Source of target-system field definitions used by metadata validation.
pub trait FieldDictionary: Send + Sync {
    fn tables(&self) -> &[DictionaryTable];

    /// First field whose label contains `header`, or is contained in it, or
    /// whose technical name equals it. Case-insensitive. Empty headers never
    /// match.
    fn find_match(&self, header: &str) -> Option<&DictionaryField> {
        let header = header.trim().to_lowercase();
        if header.is_empty() {
            return None;
        }
        self.tables()
            .iter()
            .flat_map(|t| t.fields.iter())
            .find(|f| {
                let label = f.label.to_lowercase();
                label.contains(&header)
                    || header.contains(&label)
                    || f.technical_name.to_lowercase() == header
            })
    }
}

/// Built-in material master dictionary (MARA, MARC, MARD).
#[derive(Debug, Clone)]
pub struct SapMaterialDictionary {
    tables: Vec<DictionaryTable>,
}

fn table(name: &str, description: &str, fields: &[(&str, &str, &str, u32)]) -> DictionaryTable {
    DictionaryTable {
        table_name: name.to_string(),
        description: description.to_string(),
        fields: fields
            .iter()
            .map(|(label, tech, dtype, len)| DictionaryField::new(label, tech, dtype, *len))
            .collect(),
    }
}

impl Default for SapMaterialDictionary {
    fn default() -> Self {
        let tables = vec![
            table(
                "MARA",
                "General Material Data",
                &[
                    ("Material Number", "MATNR", "CHAR", 18),
                    ("Created On", "ERSDA", "DATS", 8),
                    ("Created By", "ERNAM", "CHAR", 12),
                    ("Last Change", "LAEDA", "DATS", 8),
                    ("Deletion Indicator", "LVORM", "CHAR", 1),
                    ("Material Type", "MTART", "CHAR", 4),
                    ("Industry Sector", "MBRSH", "CHAR", 1),
                    ("Material Group", "MATKL", "CHAR", 9),
                    ("Old Material Number", "BISMT", "CHAR", 18),
                    ("Base Unit of Measure", "MEINS", "UNIT", 3),
                    ("Division", "SPART", "CHAR", 2),
                    ("Gross Weight", "BRGEW", "QUAN", 13),
                    ("Net Weight", "NTGEW", "QUAN", 13),
                    ("Weight Unit", "GEWEI", "UNIT", 3),
                    ("Volume", "VOLUM", "QUAN", 13),
                    ("Volume Unit", "VOLEH", "UNIT", 3),
                    ("Cross-Plant Status", "MSTAE", "CHAR", 2),
                    ("Lab/Office", "LABOR", "CHAR", 3),
                    ("EAN/UPC Number", "EAN11", "CHAR", 18),
                ],
            ),
            table(
                "MARC",
                "Plant Data for Material",
                &[
                    ("Plant", "WERKS", "CHAR", 4),
                    ("Purchasing Group", "EKGRP", "CHAR", 3),
                    ("MRP Type", "DISMM", "CHAR", 2),
                    ("MRP Controller", "DISPO", "CHAR", 3),
                    ("Loading Group", "LADGR", "CHAR", 4),
                    ("Profit Center", "PRCTR", "CHAR", 10),
                    ("Batch Management", "XCHPF", "CHAR", 1),
                ],
            ),
            table(
                "MARD",
                "Storage Location Data",
                &[
                    ("Plant", "WERKS", "CHAR", 4),
                    ("Storage Location", "LGORT", "CHAR", 4),
                    ("Storage Bin", "LGPBE", "CHAR", 10),
                    ("Total Stock", "LABST", "QUAN", 13),
                ],
            ),
        ];
        Self { tables }
    }
}

impl SapMaterialDictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FieldDictionary for SapMaterialDictionary {
    fn tables(&self) -> &[DictionaryTable] {
        &self.tables
    }
}
