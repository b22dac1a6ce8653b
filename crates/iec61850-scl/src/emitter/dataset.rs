// crates/iec61850-scl/src/emitter/dataset.rs

//! `DS(...)` blocks with one `DE(...)` member per FCDA.

use crate::issues::IssueLog;
use crate::model::{DataSet, Fcda};
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::{self, Write};

/// One DataSet member in MMS notation, e.g. `GGIO1$ST$Ind1$stVal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSetEntry {
    /// The variable name, with an `ldInst/` prefix for members of another LD.
    pub variable: String,
    pub index: Option<u32>,
    pub component: Option<String>,
    /// The text between the parentheses when it is not an array index.
    pub malformed_index: Option<String>,
}

impl DataSetEntry {
    /// Builds the member of a DataSet that lives on the LD `owner_ld_inst`.
    pub fn from_fcda(fcda: &Fcda, owner_ld_inst: &str) -> Self {
        let mut mms = fcda.ln_name();
        mms.push('$');
        mms.push_str(&fcda.fc);
        mms.push('$');
        mms.push_str(fcda.do_name.as_deref().unwrap_or_default());
        if let Some(da_name) = &fcda.da_name {
            mms.push('$');
            mms.push_str(&da_name.replace('.', "$"));
        }

        let mut entry = DataSetEntry {
            variable: mms.clone(),
            index: None,
            component: None,
            malformed_index: None,
        };

        if let Some((base, suffix)) = mms.split_once('(') {
            entry.variable = base.to_string();
            match suffix.split_once(')') {
                Some((index, component)) => match index.trim().parse::<u32>() {
                    Ok(index) => {
                        entry.index = Some(index);
                        let component = component.strip_prefix('$').unwrap_or(component);
                        entry.component = (!component.is_empty()).then(|| component.to_string());
                    }
                    Err(_) => entry.malformed_index = Some(index.to_string()),
                },
                None => entry.malformed_index = Some(suffix.to_string()),
            }
        }

        if let Some(ld_inst) = fcda.ld_inst.as_deref().filter(|inst| *inst != owner_ld_inst) {
            entry.variable = format!("{}/{}", ld_inst, entry.variable);
        }
        entry
    }
}

impl fmt::Display for DataSetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DE({}", self.variable)?;
        if let Some(index) = self.index {
            write!(f, " {}", index)?;
            if let Some(component) = &self.component {
                write!(f, " {}", component)?;
            }
        }
        f.write_str(");")
    }
}

/// Writes a `DS` block. A member whose array index cannot be read is written
/// without index fields and reported on `issues`.
pub(crate) fn write_data_set<W: Write>(
    out: &mut W,
    data_set: &DataSet,
    owner_ld_inst: &str,
    ln_ref: &str,
    issues: &mut IssueLog,
) -> fmt::Result {
    writeln!(out, "DS({}){{", data_set.name)?;
    for fcda in &data_set.fcda {
        let entry = DataSetEntry::from_fcda(fcda, owner_ld_inst);
        if let Some(text) = &entry.malformed_index {
            issues.error(
                format!("{}.{}", ln_ref, data_set.name),
                format!(
                    "FCDA {} on DataSet {}.{} has an invalid array index \"{}\"",
                    fcda.object_reference(),
                    ln_ref,
                    data_set.name,
                    text
                ),
            );
        }
        writeln!(out, "{}", entry)?;
    }
    writeln!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fcda(ld_inst: &str, do_name: &str, da_name: Option<&str>) -> Fcda {
        Fcda {
            ld_inst: Some(ld_inst.to_string()),
            ln_class: Some("GGIO".to_string()),
            ln_inst: Some("1".to_string()),
            do_name: Some(do_name.to_string()),
            da_name: da_name.map(str::to_string),
            fc: "ST".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_member_of_own_ld_has_no_prefix() {
        let entry = DataSetEntry::from_fcda(&fcda("GenericIO", "Ind1", Some("stVal")), "GenericIO");
        assert_eq!(entry.to_string(), "DE(GGIO1$ST$Ind1$stVal);");
    }

    #[test]
    fn test_member_of_other_ld_is_prefixed() {
        let entry = DataSetEntry::from_fcda(&fcda("Other", "Ind1", None), "GenericIO");
        assert_eq!(entry.to_string(), "DE(Other/GGIO1$ST$Ind1);");
    }

    #[test]
    fn test_dotted_da_name_becomes_mms_path() {
        let entry = DataSetEntry::from_fcda(&fcda("GenericIO", "AnIn1", Some("mag.f")), "GenericIO");
        assert_eq!(entry.variable, "GGIO1$ST$AnIn1$mag$f");
    }

    #[test]
    fn test_array_index_and_component() {
        let entry = DataSetEntry::from_fcda(&fcda("GenericIO", "Arr(2)", Some("mag.f")), "GenericIO");
        assert_eq!(entry.variable, "GGIO1$ST$Arr");
        assert_eq!(entry.index, Some(2));
        assert_eq!(entry.component.as_deref(), Some("mag$f"));
        assert_eq!(entry.to_string(), "DE(GGIO1$ST$Arr 2 mag$f);");

        let entry = DataSetEntry::from_fcda(&fcda("GenericIO", "Arr(5)", None), "GenericIO");
        assert_eq!(entry.to_string(), "DE(GGIO1$ST$Arr 5);");
    }

    #[test]
    fn test_invalid_index_is_reported() {
        let ds = DataSet {
            name: "Events".to_string(),
            fcda: alloc::vec![fcda("GenericIO", "Arr(x)", None)],
        };
        let mut out = String::new();
        let mut issues = IssueLog::new();
        write_data_set(&mut out, &ds, "GenericIO", "IED1GenericIO/LLN0", &mut issues).unwrap();
        assert_eq!(out, "DS(Events){\nDE(GGIO1$ST$Arr);\n}\n");
        assert_eq!(issues.len(), 1);
    }
}
