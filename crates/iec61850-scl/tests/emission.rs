// crates/iec61850-scl/tests/emission.rs

use iec61850_scl::{
    EmitOptions, ResolveOptions, SclDocument, emit_static_model, generate_static_model,
    load_scl_from_str, resolve_ied,
};
use std::fs;
use std::path::PathBuf;

/// Helper function to load a test file from the `tests/data/` directory.
fn load_test_file(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

fn emit(doc: &SclDocument, ied: &str, options: &EmitOptions) -> String {
    let resolved = resolve_ied(doc, ied, None, &ResolveOptions::default())
        .unwrap_or_else(|e| panic!("resolve failed: {}", e));
    let mut out = String::new();
    emit_static_model(&resolved, doc, options, &mut out)
        .unwrap_or_else(|e| panic!("emit failed: {}", e));
    out
}

/// The `LN(name){` ... `}` block of one logical node.
fn ln_block<'a>(model: &'a str, ln: &str) -> &'a str {
    let start = model
        .find(&format!("LN({}){{\n", ln))
        .unwrap_or_else(|| panic!("LN {} not emitted", ln));
    let rest = &model[start..];
    let end = rest.find("\n}\nLN(").or_else(|| rest.find("\n}\n}\n")).unwrap_or(rest.len());
    &rest[..end + 2]
}

const MOD_ENUM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SCL xmlns="http://www.iec.ch/61850/2003/SCL">
  <IED name="IED1">
    <AccessPoint name="AP1">
      <Server>
        <LDevice inst="LD0">
          <LN0 lnClass="LLN0" lnType="LLN0_Type" inst="">
            <DOI name="Mod">
              <DAI name="stVal"><Val>on</Val></DAI>
            </DOI>
          </LN0>
        </LDevice>
      </Server>
    </AccessPoint>
  </IED>
  <DataTypeTemplates>
    <LNodeType id="LLN0_Type" lnClass="LLN0">
      <DO name="Mod" type="ENC_Type"/>
    </LNodeType>
    <DOType id="ENC_Type" cdc="ENC">
      <DA name="stVal" bType="Enum" type="Mod_Type" fc="ST"/>
    </DOType>
    <EnumType id="Mod_Type">
      <EnumVal ord="1">on</EnumVal>
    </EnumType>
  </DataTypeTemplates>
</SCL>"#;

#[test]
fn test_enumerated_value_is_emitted_as_ordinal() {
    let doc = load_scl_from_str(MOD_ENUM).unwrap();
    let out = emit(&doc, "IED1", &EmitOptions::default());

    assert_eq!(
        out,
        "MODEL(IED1){\nLD(LD0){\nLN(LLN0){\nDO(Mod 0){\nDA(stVal 0 12 0 16 0)=1;\n}\n}\n}\n}\n"
    );
}

const ARRAYS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SCL xmlns="http://www.iec.ch/61850/2003/SCL">
  <IED name="IED1">
    <AccessPoint name="AP1">
      <Server>
        <LDevice inst="LD0">
          <LN lnClass="GGIO" lnType="GGIO_Type" inst="1">
            <DOI name="Ind">
              <DAI name="stVal"><Val>true</Val></DAI>
            </DOI>
          </LN>
        </LDevice>
      </Server>
    </AccessPoint>
  </IED>
  <DataTypeTemplates>
    <LNodeType id="GGIO_Type" lnClass="GGIO">
      <DO name="Ind" type="SPS_Type" count="3"/>
      <DO name="Tmp" type="Tmp_Type" transient="true"/>
      <DO name="Hist" type="Hist_Type"/>
    </LNodeType>
    <DOType id="SPS_Type" cdc="SPS">
      <DA name="stVal" bType="BOOLEAN" fc="ST" dchg="true"/>
    </DOType>
    <DOType id="Tmp_Type" cdc="SPS">
      <DA name="stVal" bType="BOOLEAN" fc="ST" dchg="true"/>
    </DOType>
    <DOType id="Hist_Type" cdc="HST">
      <DA name="hstVal" bType="INT32" fc="ST" count="2" sAddr="42"/>
    </DOType>
  </DataTypeTemplates>
</SCL>"#;

#[test]
fn test_data_object_array_repeats_children() {
    let doc = load_scl_from_str(ARRAYS).unwrap();
    let out = emit(&doc, "IED1", &EmitOptions::default());

    let block = "[0]{\nDA(stVal 0 0 0 17 0)=1;\n}\n";
    let expected_ind = format!(
        "DO(Ind 3){{\n{}{}{}}}\n",
        block,
        block.replace("[0]", "[1]"),
        block.replace("[0]", "[2]")
    );
    assert!(out.contains(&expected_ind), "got:\n{}", out);
    assert_eq!(out.matches("DA(stVal 0 0 0 17 0)").count(), 3);
}

#[test]
fn test_transient_and_attribute_arrays() {
    let doc = load_scl_from_str(ARRAYS).unwrap();
    let out = emit(&doc, "IED1", &EmitOptions::default());

    // Transient data objects add 128 to the trigger options of their attributes.
    assert!(out.contains("DO(Tmp 0){\nDA(stVal 0 0 0 145 0);\n}\n"), "got:\n{}", out);
    assert!(
        out.contains("DO(Hist 0){\nDA(hstVal 2 3 0 16 42){\n[0];\n[1];\n}\n}\n"),
        "got:\n{}",
        out
    );
}

#[test]
fn test_full_document() {
    let xml = load_test_file("simple_io.scd");
    let doc = load_scl_from_str(&xml).unwrap();
    let out = emit(&doc, "simpleIO", &EmitOptions::default());

    assert!(out.starts_with("MODEL(simpleIO){\nLD(GenericIO){\nLN(LLN0){\n"));
    assert!(out.ends_with("}\n}\n}\n"));

    let lln0 = ln_block(&out, "LLN0");
    assert!(lln0.contains("DO(Mod 0){\nDA(stVal 0 12 0 17 0)=1;\nDA(q 0 23 0 18 0);\nDA(t 0 22 0 16 0);\nDA(ctlModel 0 12 4 16 0)=0;\n}\n"));
    assert!(lln0.contains("DA(configRev 0 20 5 16 0)=\"1\";"));
    assert!(lln0.contains("DS(Events){\nDE(GGIO1$ST$Ind1$stVal);\nDE(GGIO1$MX$AnIn1$mag$f);\n}\n"));
    assert!(lln0.contains("RC(EventsRCB01 Events1 0 Events 1 24 47 50 1000);\nRC(EventsRCB02 Events1 0 Events 1 24 47 50 1000);\n"));
    assert!(lln0.contains("LC(EventLog Events GenericIO/LLN0$GenericLog 17 0 1 0);\n"));
    assert!(lln0.contains("LOG(GenericLog);\n"));
    assert!(lln0.contains("GC(gcbEvents events Events 2 0 1000 3000){\nPA(4 000 1000 010CCD010001);\n}\n"));

    let ggio = ln_block(&out, "GGIO1");
    assert!(ggio.contains("DO(AnIn1 0){\nDA(mag 0 27 1 17 0){\nDA(f 0 10 1 16 0);\n}\n"));
    assert!(ggio.contains("DA(ctlModel 0 12 4 16 0)=1;"));
    assert!(ggio.contains("DA(origin 0 27 12 16 0){\nDA(orCat 0 12 12 16 0);\nDA(orIdent 0 13 12 16 0);\n}\n"));
}

#[test]
fn test_owner_flag_sets_report_bit() {
    let xml = load_test_file("simple_io.scd");
    let doc = load_scl_from_str(&xml).unwrap();
    let out = emit(&doc, "simpleIO", &EmitOptions { has_owner: true });

    assert!(out.contains("RC(EventsRCB01 Events1 0 Events 1 88 47 50 1000);"));
}

#[test]
fn test_gse_control_without_communication() {
    let xml = load_test_file("simple_io.scd");
    let start = xml.find("<Communication>").unwrap();
    let end = xml.find("</Communication>").unwrap() + "</Communication>".len();
    let without_comm = format!("{}{}", &xml[..start], &xml[end..]);

    let doc = load_scl_from_str(&without_comm).unwrap();
    let out = emit(&doc, "simpleIO", &EmitOptions::default());

    assert!(out.contains("GC(gcbEvents events Events 2 0 0 0);\n"), "got:\n{}", out);
    assert!(!out.contains("PA("));
}

#[test]
fn test_gse_control_defaults() {
    let xml = MOD_ENUM.replace(
        "<DOI name=\"Mod\">",
        "<GSEControl name=\"gcb\"/>\n            <DOI name=\"Mod\">",
    );
    let doc = load_scl_from_str(&xml).unwrap();
    let out = emit(&doc, "IED1", &EmitOptions::default());

    assert!(out.contains("GC(gcb null null 0 0 0 0);\n"), "got:\n{}", out);
}

#[test]
fn test_data_set_members_of_other_devices_are_prefixed() {
    let xml = MOD_ENUM.replace(
        "<DOI name=\"Mod\">",
        r#"<DataSet name="ds">
              <FCDA ldInst="LD0" lnClass="LLN0" doName="Mod" daName="stVal" fc="ST"/>
              <FCDA ldInst="LD1" prefix="Q0" lnClass="XCBR" lnInst="1" doName="Pos" fc="ST"/>
            </DataSet>
            <DOI name="Mod">"#,
    );
    let doc = load_scl_from_str(&xml).unwrap();
    let resolved = resolve_ied(&doc, "IED1", None, &ResolveOptions::default()).unwrap();
    let mut out = String::new();
    emit_static_model(&resolved, &doc, &EmitOptions::default(), &mut out).unwrap();

    assert!(out.contains("DS(ds){\nDE(LLN0$ST$Mod$stVal);\nDE(LD1/Q0XCBR1$ST$Pos);\n}\n"));

    // The second member points at a logical device that does not exist.
    let fcda_errors: Vec<_> = resolved
        .issues
        .errors()
        .filter(|i| i.message.starts_with("FCDA "))
        .collect();
    assert_eq!(fcda_errors.len(), 1);
    assert_eq!(
        fcda_errors[0].message,
        "FCDA LD1/Q0XCBR1.Pos on DataSet IED1LD0/LLN0.ds not found on data type templates"
    );
}

#[test]
fn test_generate_static_model_collects_all_issues() {
    let xml = load_test_file("simple_io.scd");
    let doc = load_scl_from_str(&xml).unwrap();
    let mut out = String::new();
    let issues = generate_static_model(
        &doc,
        "simpleIO",
        Some("accessPoint1"),
        &ResolveOptions::default(),
        &EmitOptions::default(),
        &mut out,
    )
    .unwrap();

    assert!(issues.is_empty());
    assert_eq!(out, emit(&doc, "simpleIO", &EmitOptions::default()));
}
