// crates/iec61850-scl/src/parser.rs

use crate::communication;
use crate::error::SclError;
use crate::issues::IssueLog;
use crate::model::{self, ConnectedAp, Header, Ied};
use crate::templates::TypeTemplateRegistry;
use alloc::string::String;
use alloc::vec::Vec;
use log::info;

/// A loaded SCL document: the typed template registry plus the IED and
/// Communication sections the resolver and emitter read from.
#[derive(Debug)]
pub struct SclDocument {
    pub version: Option<String>,
    pub revision: Option<String>,
    pub release: Option<String>,
    pub header: Option<Header>,
    pub templates: TypeTemplateRegistry,
    pub ieds: Vec<Ied>,
    pub communication: Option<model::Communication>,
    /// Problems found while building the registry (dropped templates).
    pub load_issues: IssueLog,
}

impl SclDocument {
    pub fn ied(&self, name: &str) -> Option<&Ied> {
        self.ieds.iter().find(|ied| ied.name == name)
    }

    pub fn ied_names(&self) -> Vec<&str> {
        self.ieds.iter().map(|ied| ied.name.as_str()).collect()
    }

    /// The ConnectedAP entry of an IED's AccessPoint, if the document has one.
    pub fn connected_ap(&self, ap_name: &str, ied_name: &str) -> Option<&ConnectedAp> {
        communication::connected_ap(self.communication.as_ref(), ap_name, ied_name)
    }
}

/// Parses an SCL (ICD/CID/SCD) string slice.
///
/// Template children with missing mandatory attributes do not fail the load;
/// the affected template is left out and reported in
/// [`SclDocument::load_issues`].
///
/// # Errors
/// Returns `SclError::XmlParsing` if the document is not well-formed or does
/// not match the expected structure.
pub fn load_scl_from_str(xml_content: &str) -> Result<SclDocument, SclError> {
    // 1. Deserialize the raw XML string into our internal model.
    let scl: model::Scl = quick_xml::de::from_str(xml_content)?;

    // 2. Build the typed registry; malformed templates become issues.
    let mut load_issues = IssueLog::new();
    let templates =
        TypeTemplateRegistry::from_model(scl.data_type_templates.as_ref(), &mut load_issues);

    info!(
        "[SCL] Loaded document with {} IED(s), {} template issue(s)",
        scl.ied.len(),
        load_issues.len()
    );

    Ok(SclDocument {
        version: scl.version,
        revision: scl.revision,
        release: scl.release,
        header: scl.header,
        templates,
        ieds: scl.ied,
        communication: scl.communication,
        load_issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::AttributeType;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SCL xmlns="http://www.iec.ch/61850/2003/SCL" version="2007" revision="B" release="4">
  <Header id="minimal"/>
  <IED name="IED1">
    <AccessPoint name="AP1"/>
  </IED>
  <DataTypeTemplates>
    <DOType id="SPS_1" cdc="SPS">
      <DA name="stVal" bType="BOOLEAN" fc="ST" dchg="true"/>
      <DA name="q" bType="Quality" fc="ST" qchg="true"/>
    </DOType>
    <EnumType id="Beh">
      <EnumVal ord="1">on</EnumVal>
      <EnumVal ord="5">off</EnumVal>
    </EnumType>
  </DataTypeTemplates>
</SCL>"#;

    #[test]
    fn test_load_minimal_document() {
        let doc = load_scl_from_str(MINIMAL).unwrap();
        assert_eq!(doc.version.as_deref(), Some("2007"));
        assert_eq!(doc.ied_names(), ["IED1"]);
        assert!(doc.load_issues.is_empty());

        let sps = doc.templates.get_do_type("SPS_1").unwrap();
        assert_eq!(sps.data_attributes.len(), 2);
        assert_eq!(sps.data_attributes[0].attribute_type, AttributeType::Boolean);
        assert_eq!(sps.data_attributes[0].trigger_options.bits(), 17);
        assert_eq!(sps.data_attributes[1].trigger_options.bits(), 18);

        let beh = doc.templates.get_enum_type("Beh").unwrap();
        assert_eq!(beh.ord_of("off"), Some(5));
    }

    #[test]
    fn test_missing_templates_gives_empty_registry() {
        let doc = load_scl_from_str(r#"<SCL><IED name="X"/></SCL>"#).unwrap();
        assert!(doc.templates.get_lnode_type("anything").is_none());
        assert_eq!(doc.templates.ids().count(), 0);
    }
}
