// crates/iec61850-scl/src/model/control.rs

//! Raw control-block structures attached to a logical node.

use alloc::string::String;
use serde::Deserialize;

/// `<ReportControl name=".." rptID=".." datSet=".." confRev=".." buffered=".." bufTime=".." intgPd=".." indexed="..">`
#[derive(Debug, Deserialize, Default)]
pub struct ReportControl {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@rptID", default)]
    pub rpt_id: Option<String>,

    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,

    #[serde(rename = "@confRev", default)]
    pub conf_rev: Option<String>,

    #[serde(rename = "@buffered", default)]
    pub buffered: Option<String>,

    #[serde(rename = "@bufTime", default)]
    pub buf_time: Option<String>,

    #[serde(rename = "@intgPd", default)]
    pub intg_pd: Option<String>,

    #[serde(rename = "@indexed", default)]
    pub indexed: Option<String>,

    #[serde(rename = "TrgOps", default)]
    pub trg_ops: Option<TrgOps>,

    #[serde(rename = "OptFields", default)]
    pub opt_fields: Option<OptFields>,

    #[serde(rename = "RptEnabled", default)]
    pub rpt_enabled: Option<RptEnabled>,
}

/// `<TrgOps dchg=".." qchg=".." dupd=".." period=".." gi=".."/>`
#[derive(Debug, Deserialize, Default)]
pub struct TrgOps {
    #[serde(rename = "@dchg", default)]
    pub dchg: Option<String>,
    #[serde(rename = "@qchg", default)]
    pub qchg: Option<String>,
    #[serde(rename = "@dupd", default)]
    pub dupd: Option<String>,
    #[serde(rename = "@period", default)]
    pub period: Option<String>,
    #[serde(rename = "@gi", default)]
    pub gi: Option<String>,
}

/// `<OptFields seqNum=".." timeStamp=".." .../>`
#[derive(Debug, Deserialize, Default)]
pub struct OptFields {
    #[serde(rename = "@seqNum", default)]
    pub seq_num: Option<String>,
    #[serde(rename = "@timeStamp", default)]
    pub time_stamp: Option<String>,
    #[serde(rename = "@reasonCode", default)]
    pub reason_code: Option<String>,
    #[serde(rename = "@dataSet", default)]
    pub data_set: Option<String>,
    #[serde(rename = "@dataRef", default)]
    pub data_ref: Option<String>,
    #[serde(rename = "@bufOvfl", default)]
    pub buf_ovfl: Option<String>,
    #[serde(rename = "@entryID", default)]
    pub entry_id: Option<String>,
    #[serde(rename = "@configRef", default)]
    pub config_ref: Option<String>,
}

/// `<RptEnabled max=".."/>`
#[derive(Debug, Deserialize, Default)]
pub struct RptEnabled {
    #[serde(rename = "@max", default)]
    pub max: Option<String>,
}

/// `<LogControl name=".." datSet=".." logName=".." logEna=".." reasonCode=".." intgPd="..">`
#[derive(Debug, Deserialize, Default)]
pub struct LogControl {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,

    #[serde(rename = "@intgPd", default)]
    pub intg_pd: Option<String>,

    #[serde(rename = "@ldInst", default)]
    pub ld_inst: Option<String>,

    #[serde(rename = "@prefix", default)]
    pub prefix: Option<String>,

    #[serde(rename = "@lnClass", default)]
    pub ln_class: Option<String>,

    #[serde(rename = "@lnInst", default)]
    pub ln_inst: Option<String>,

    #[serde(rename = "@logName", default)]
    pub log_name: Option<String>,

    #[serde(rename = "@logEna", default)]
    pub log_ena: Option<String>,

    #[serde(rename = "@reasonCode", default)]
    pub reason_code: Option<String>,

    #[serde(rename = "TrgOps", default)]
    pub trg_ops: Option<TrgOps>,
}

/// `<Log name=".."/>`
#[derive(Debug, Deserialize, Default)]
pub struct Log {
    #[serde(rename = "@name", default)]
    pub name: String,
}

/// `<GSEControl name=".." appID=".." datSet=".." confRev=".." fixedOffs="..">`
#[derive(Debug, Deserialize, Default)]
pub struct GseControl {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@appID", default)]
    pub app_id: Option<String>,

    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,

    #[serde(rename = "@confRev", default)]
    pub conf_rev: Option<String>,

    #[serde(rename = "@fixedOffs", default)]
    pub fixed_offs: Option<String>,

    #[serde(rename = "@type", default)]
    pub gse_type: Option<String>,
}

/// `<SampledValueControl name=".." smvID=".." datSet=".." confRev=".." smpMod=".." smpRate=".." nofASDU=".." multicast="..">`
#[derive(Debug, Deserialize, Default)]
pub struct SampledValueControl {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@smvID", default)]
    pub smv_id: Option<String>,

    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,

    #[serde(rename = "@confRev", default)]
    pub conf_rev: Option<String>,

    #[serde(rename = "@smpMod", default)]
    pub smp_mod: Option<String>,

    #[serde(rename = "@smpRate", default)]
    pub smp_rate: Option<String>,

    #[serde(rename = "@nofASDU", default)]
    pub nof_asdu: Option<String>,

    #[serde(rename = "@multicast", default)]
    pub multicast: Option<String>,

    #[serde(rename = "SmvOpts", default)]
    pub smv_opts: Option<SmvOpts>,
}

/// `<SmvOpts refreshTime=".." sampleSynchronized=".." sampleRate=".." dataSet=".." security=".."/>`
#[derive(Debug, Deserialize, Default)]
pub struct SmvOpts {
    #[serde(rename = "@refreshTime", default)]
    pub refresh_time: Option<String>,
    #[serde(rename = "@sampleSynchronized", default)]
    pub sample_synchronized: Option<String>,
    #[serde(rename = "@sampleRate", default)]
    pub sample_rate: Option<String>,
    #[serde(rename = "@dataSet", default)]
    pub data_set: Option<String>,
    #[serde(rename = "@security", default)]
    pub security: Option<String>,
}

/// `<SettingControl numOfSGs=".." actSG=".." resvTms=".."/>`
#[derive(Debug, Deserialize, Default)]
pub struct SettingControl {
    #[serde(rename = "@numOfSGs", default)]
    pub num_of_sgs: Option<String>,

    #[serde(rename = "@actSG", default)]
    pub act_sg: Option<String>,

    #[serde(rename = "@resvTms", default)]
    pub resv_tms: Option<String>,
}
