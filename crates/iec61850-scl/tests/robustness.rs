//! Integration tests focused on error handling and edge cases.
//!
//! These tests ensure malformed documents, unknown names, broken templates and
//! bad instance values are reported as errors or issues without panicking.

use iec61850_scl::{
    EmitOptions, ResolveOptions, SclError, Severity, TemplateKind, emit_static_model,
    generate_static_model, load_scl_from_str, resolve_ied,
};

/// A small valid document used as a base for corrupted variants.
const MINIMAL_VALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SCL xmlns="http://www.iec.ch/61850/2003/SCL" version="2007" revision="B" release="4">
  <Header id="robustness"/>
  <Communication>
    <SubNetwork name="bus">
      <ConnectedAP iedName="IED1" apName="AP1">
        <Address>
          <P type="IP">192.168.0.10</P>
        </Address>
      </ConnectedAP>
    </SubNetwork>
  </Communication>
  <IED name="IED1">
    <AccessPoint name="AP1">
      <Server>
        <LDevice inst="LD0">
          <LN0 lnClass="LLN0" lnType="LLN0_Type" inst="">
            <DOI name="NamPlt">
              <DAI name="configRev"><Val>7</Val></DAI>
              <DAI name="ldNs"><Val>IEC 61850-7-4:2007B</Val></DAI>
            </DOI>
          </LN0>
        </LDevice>
      </Server>
    </AccessPoint>
    <AccessPoint name="AP2"/>
  </IED>
  <DataTypeTemplates>
    <LNodeType id="LLN0_Type" lnClass="LLN0">
      <DO name="NamPlt" type="LPL_Type"/>
      <DO name="Beh" type="ENS_Type"/>
    </LNodeType>
    <DOType id="LPL_Type" cdc="LPL">
      <DA name="vendor" bType="VisString255" fc="DC"/>
      <DA name="configRev" bType="VisString255" fc="DC"/>
      <DA name="ldNs" bType="VisString255" fc="EX"/>
    </DOType>
    <DOType id="ENS_Type" cdc="ENS">
      <DA name="stVal" bType="Enum" type="Beh" fc="ST" dchg="true"/>
    </DOType>
    <EnumType id="Beh">
      <EnumVal ord="1">on</EnumVal>
      <EnumVal ord="5">off</EnumVal>
    </EnumType>
  </DataTypeTemplates>
</SCL>"#;

fn resolve_messages(xml: &str) -> Vec<(Severity, String)> {
    let doc = load_scl_from_str(xml).unwrap_or_else(|e| panic!("load failed: {}", e));
    let resolved = resolve_ied(&doc, "IED1", Some("AP1"), &ResolveOptions::default())
        .unwrap_or_else(|e| panic!("resolve failed: {}", e));
    resolved
        .issues
        .iter()
        .map(|i| (i.severity, i.message.clone()))
        .collect()
}

#[test]
fn test_minimal_document_is_clean() {
    assert!(resolve_messages(MINIMAL_VALID_XML).is_empty());
}

/// Verifies that the parser catches malformed XML syntax (e.g., unclosed tags).
#[test]
fn test_malformed_xml_syntax() {
    let xml = r#"<SCL><IED name="IED1"><AccessPoint name="AP1"> ... missing closing tags"#;
    let result = load_scl_from_str(xml);
    assert!(
        matches!(result, Err(SclError::XmlParsing(_))),
        "Expected XmlParsing error, got {:?}",
        result
    );
}

#[test]
fn test_unknown_ied_and_access_point() {
    let doc = load_scl_from_str(MINIMAL_VALID_XML).unwrap();

    let result = resolve_ied(&doc, "NoSuchIED", None, &ResolveOptions::default());
    assert!(matches!(result, Err(SclError::IedNotFound { ref ied }) if ied == "NoSuchIED"));

    let result = resolve_ied(&doc, "IED1", Some("AP9"), &ResolveOptions::default());
    assert!(matches!(
        result,
        Err(SclError::AccessPointNotFound { ref access_point, .. }) if access_point == "AP9"
    ));

    let mut out = String::new();
    let result = generate_static_model(
        &doc,
        "NoSuchIED",
        None,
        &ResolveOptions::default(),
        &EmitOptions::default(),
        &mut out,
    );
    assert!(result.is_err());
    assert!(out.is_empty());
}

#[test]
fn test_access_point_without_server() {
    let doc = load_scl_from_str(MINIMAL_VALID_XML).unwrap();
    let resolved = resolve_ied(&doc, "IED1", Some("AP2"), &ResolveOptions::default()).unwrap();
    assert!(resolved.model.is_empty());

    let mut out = String::new();
    emit_static_model(&resolved, &doc, &EmitOptions::default(), &mut out).unwrap();
    assert_eq!(out, "MODEL(IED1){\n}\n");
}

#[test]
fn test_malformed_template_is_dropped() {
    // A DA without bType makes its whole DOType unusable.
    let xml = MINIMAL_VALID_XML.replace(
        r#"<DA name="stVal" bType="Enum" type="Beh" fc="ST" dchg="true"/>"#,
        r#"<DA name="stVal" type="Beh" fc="ST"/>"#,
    );
    let doc = load_scl_from_str(&xml).unwrap();

    assert!(!doc.templates.contains(TemplateKind::DOType, "ENS_Type"));
    let load: Vec<_> = doc.load_issues.iter().collect();
    assert_eq!(load.len(), 1);
    assert_eq!(load[0].object, "ENS_Type");
    assert_eq!(load[0].message, "DA is missing bType attribute");

    let resolved = resolve_ied(&doc, "IED1", None, &ResolveOptions::default()).unwrap();
    assert!(resolved.model.find("IED1LD0/LLN0.NamPlt.vendor").is_some());
    assert!(resolved.model.find("IED1LD0/LLN0.Beh").is_none());
    assert!(
        resolved
            .issues
            .errors()
            .any(|i| i.message == r#"DOType "ENS_Type" of DO "Beh" is not defined"#)
    );

    // The facade reports load and resolution issues together.
    let mut out = String::new();
    let issues = generate_static_model(
        &doc,
        "IED1",
        None,
        &ResolveOptions::default(),
        &EmitOptions::default(),
        &mut out,
    )
    .unwrap();
    assert_eq!(issues.len(), 2);
    assert!(out.contains("DO(NamPlt 0){"));
}

#[test]
fn test_unknown_fc_and_missing_ord() {
    let xml = MINIMAL_VALID_XML
        .replace(r#"fc="DC""#, r#"fc="XX""#)
        .replace(r#"<EnumVal ord="5">off</EnumVal>"#, r#"<EnumVal>off</EnumVal>"#);
    let doc = load_scl_from_str(&xml).unwrap();

    assert!(!doc.templates.contains(TemplateKind::DOType, "LPL_Type"));
    assert!(!doc.templates.contains(TemplateKind::EnumType, "Beh"));
    let messages: Vec<_> = doc.load_issues.iter().map(|i| i.message.as_str()).collect();
    assert!(messages.contains(&r#"DA "vendor" has unknown functional constraint "XX""#));
    assert!(messages.contains(&r#"EnumVal "off" has no valid ord attribute"#));

    // Resolution continues over what is left.
    let result = resolve_ied(&doc, "IED1", None, &ResolveOptions::default());
    assert!(result.is_ok());
}

#[test]
fn test_namespace_issues() {
    let unknown = MINIMAL_VALID_XML.replace("IEC 61850-7-4:2007B", "Vendor:2020A");
    assert_eq!(
        resolve_messages(&unknown),
        [(
            Severity::Warning,
            "Namespace on IED1LD0/LLN0.NamPlt.ldNs not found on NSD files. Value: Vendor:2020A"
                .to_string()
        )]
    );

    let empty = MINIMAL_VALID_XML.replace(
        r#"<DAI name="ldNs"><Val>IEC 61850-7-4:2007B</Val></DAI>"#,
        r#"<DAI name="ldNs"/>"#,
    );
    assert_eq!(
        resolve_messages(&empty),
        [(
            Severity::Error,
            "Namespace on IED1LD0/LLN0.NamPlt.ldNs has no value".to_string()
        )]
    );
}

#[test]
fn test_missing_config_rev() {
    // Neither the NamPlt type nor the DOI provides configRev.
    let xml = MINIMAL_VALID_XML
        .replace(r#"<DAI name="configRev"><Val>7</Val></DAI>"#, "")
        .replace(r#"<DA name="configRev" bType="VisString255" fc="DC"/>"#, "");
    assert_eq!(
        resolve_messages(&xml),
        [(
            Severity::Error,
            "DA or DAI LLN0.NamPlt.configRev not found on LD LD0".to_string()
        )]
    );

    let options = ResolveOptions {
        check_config_rev: false,
        ..Default::default()
    };
    let doc = load_scl_from_str(&xml).unwrap();
    let resolved = resolve_ied(&doc, "IED1", None, &options).unwrap();
    assert!(resolved.issues.is_empty());
}

#[test]
fn test_bad_physical_addresses_are_reported() {
    let xml = MINIMAL_VALID_XML.replace(
        r#"<P type="IP">192.168.0.10</P>"#,
        r#"<P type="APPID">12345</P><P type="MAC-Address">01-0C-CD</P>"#,
    );
    let messages: Vec<_> = resolve_messages(&xml).into_iter().map(|(_, m)| m).collect();
    assert_eq!(
        messages,
        [
            "P address of type APPID size it is not 4. Actual size: 5",
            "P address of type MAC-Address does not have a array size 6 value. Actual size: 3",
        ]
    );
}

#[test]
fn test_duplicate_issues_are_reported_once() {
    let xml = MINIMAL_VALID_XML.replace(
        r#"<DOI name="NamPlt">"#,
        r#"<DOI name="Beh"><DAI name="stVal"><Val>broken</Val></DAI></DOI>
            <DOI name="Beh"><DAI name="stVal"><Val>broken</Val></DAI></DOI>
            <DOI name="NamPlt">"#,
    );
    let messages = resolve_messages(&xml);
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].1,
        "Value broken in DAI IED1LD0/LLN0.Beh.stVal does not exist in enumerated type Beh"
    );
}

#[test]
fn test_unknown_enum_symbol_emits_no_value() {
    let xml = MINIMAL_VALID_XML.replace(
        r#"<DOI name="NamPlt">"#,
        r#"<DOI name="Beh"><DAI name="stVal"><Val>broken</Val></DAI></DOI>
            <DOI name="NamPlt">"#,
    );
    let doc = load_scl_from_str(&xml).unwrap();
    let resolved = resolve_ied(&doc, "IED1", None, &ResolveOptions::default()).unwrap();
    let mut out = String::new();
    emit_static_model(&resolved, &doc, &EmitOptions::default(), &mut out).unwrap();

    assert!(out.contains("DO(Beh 0){\nDA(stVal 0 12 0 17 0);\n}\n"));
}
