// crates/iec61850-scl/src/emitter/control.rs

//! Control block statements: `SG`, `RC`, `LC`, `LOG`, `GC` and `SMVC`.

use crate::communication::PhysicalAddress;
use crate::model::communication::Duration;
use crate::model::{
    Address, Gse, GseControl, Log, LogControl, OptFields, ReportControl, SampledValueControl,
    SettingControl, SmvOpts, TrgOps, non_empty, parse_bool, parse_int,
};
use crate::templates::TriggerOptions;
use alloc::string::String;
use core::fmt::{self, Write};

/// Report trigger options get this bit when the server tracks an RCB owner.
pub const RCB_OWNER_BIT: u32 = 64;

// --- Bit encodings ---

fn trigger_options(raw: &TrgOps) -> TriggerOptions {
    let flag = |v: &Option<String>, default| parse_bool(v.as_deref(), default);
    TriggerOptions {
        dchg: flag(&raw.dchg, false),
        qchg: flag(&raw.qchg, false),
        dupd: flag(&raw.dupd, false),
        period: flag(&raw.period, false),
        gi: flag(&raw.gi, true),
    }
}

/// `TrgOps` of a report or log control; 0 when the element is absent.
pub(crate) fn trg_ops_bits(raw: Option<&TrgOps>) -> u32 {
    raw.map(|t| trigger_options(t).bits()).unwrap_or(0)
}

/// seqNum=1 timeStamp=2 reasonCode=4 dataSet=8 dataRef=16 bufOvfl=32 entryID=64 configRef=128.
pub(crate) fn opt_fields_bits(raw: Option<&OptFields>) -> u32 {
    let Some(o) = raw else {
        return 0;
    };
    let flags = [
        (&o.seq_num, false),
        (&o.time_stamp, false),
        (&o.reason_code, false),
        (&o.data_set, false),
        (&o.data_ref, false),
        (&o.buf_ovfl, true),
        (&o.entry_id, false),
        (&o.config_ref, false),
    ];
    bits_of(&flags)
}

/// refreshTime=1 sampleSynchronized=2 sampleRate=4 dataSet=8 security=16.
pub(crate) fn smv_opts_bits(raw: Option<&SmvOpts>) -> u32 {
    let Some(o) = raw else {
        return 0;
    };
    let flags = [
        (&o.refresh_time, false),
        (&o.sample_synchronized, false),
        (&o.sample_rate, false),
        (&o.data_set, false),
        (&o.security, false),
    ];
    bits_of(&flags)
}

fn bits_of(flags: &[(&Option<String>, bool)]) -> u32 {
    flags
        .iter()
        .enumerate()
        .filter(|(_, (value, default))| parse_bool(value.as_deref(), *default))
        .fold(0, |bits, (i, _)| bits | (1 << i))
}

fn bit(value: bool) -> u8 {
    u8::from(value)
}

/// A non-negative integer attribute, or 0.
fn count_or_zero(value: &Option<String>) -> i64 {
    parse_int(value.as_deref()).filter(|v| *v >= 0).unwrap_or(0)
}

// --- Statements ---

pub(crate) fn write_setting_group<W: Write>(out: &mut W, sg: &SettingControl) -> fmt::Result {
    let act_sg = parse_int(sg.act_sg.as_deref()).unwrap_or(1);
    let num_of_sgs = parse_int(sg.num_of_sgs.as_deref()).unwrap_or(0);
    writeln!(out, "SG({} {})", act_sg, num_of_sgs)
}

/// Writes one `RC(...)` line, or one per instance `01..max` for an indexed
/// control block with `RptEnabled max > 1`.
pub(crate) fn write_report_control<W: Write>(out: &mut W, rc: &ReportControl, has_owner: bool) -> fmt::Result {
    let indexed = parse_bool(rc.indexed.as_deref(), true);
    let max = rc
        .rpt_enabled
        .as_ref()
        .and_then(|r| parse_int(r.max.as_deref()))
        .unwrap_or(1);

    if indexed && max > 1 {
        for i in 1..=max {
            write_report_instance(out, rc, &alloc::format!("{:02}", i), has_owner)?;
        }
        Ok(())
    } else {
        write_report_instance(out, rc, "", has_owner)
    }
}

fn write_report_instance<W: Write>(out: &mut W, rc: &ReportControl, index: &str, has_owner: bool) -> fmt::Result {
    let mut trg_ops = trg_ops_bits(rc.trg_ops.as_ref());
    if has_owner {
        trg_ops += RCB_OWNER_BIT;
    }
    writeln!(
        out,
        "RC({}{} {} {} {} {} {} {} {} {});",
        rc.name,
        index,
        non_empty(&rc.rpt_id).unwrap_or("-"),
        bit(rc.buffered.as_deref().map(str::trim) == Some("true")),
        non_empty(&rc.dat_set).unwrap_or("-"),
        count_or_zero(&rc.conf_rev),
        trg_ops,
        opt_fields_bits(rc.opt_fields.as_ref()),
        non_empty(&rc.buf_time).unwrap_or("0"),
        non_empty(&rc.intg_pd).unwrap_or("0"),
    )
}

/// `LC(...)`. The log reference is `ldInst/lnName$logName` of the owning LN.
pub(crate) fn write_log_control<W: Write>(out: &mut W, lc: &LogControl, ld_inst: &str, ln_name: &str) -> fmt::Result {
    write!(out, "LC({} {} ", lc.name, non_empty(&lc.dat_set).unwrap_or("-"))?;
    match non_empty(&lc.log_name) {
        Some(log_name) => write!(out, "{}/{}${} ", ld_inst, ln_name, log_name)?,
        None => out.write_str("- ")?,
    }
    writeln!(
        out,
        "{} {} {} {});",
        trg_ops_bits(lc.trg_ops.as_ref()),
        non_empty(&lc.intg_pd).unwrap_or("0"),
        bit(parse_bool(lc.log_ena.as_deref(), true)),
        bit(parse_bool(lc.reason_code.as_deref(), true)),
    )
}

pub(crate) fn write_log<W: Write>(out: &mut W, log: &Log) -> fmt::Result {
    writeln!(out, "LOG({});", log.name)
}

/// `GC(...)`, with `minTime`/`maxTime` and the `PA` block taken from the
/// matching GSE entry when there is one.
pub(crate) fn write_gse_control<W: Write>(out: &mut W, gc: &GseControl, gse: Option<&Gse>) -> fmt::Result {
    write!(
        out,
        "GC({} {} {} {} {} ",
        gc.name,
        non_empty(&gc.app_id).unwrap_or("null"),
        non_empty(&gc.dat_set).unwrap_or("null"),
        count_or_zero(&gc.conf_rev),
        bit(parse_bool(gc.fixed_offs.as_deref(), false)),
    )?;

    fn time(d: Option<&Duration>) -> &str {
        d.map(|d| d.value.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or("0")
    }
    match gse {
        Some(gse) => write!(out, "{} {}", time(gse.min_time.as_ref()), time(gse.max_time.as_ref()))?,
        None => out.write_str("0 0")?,
    }

    write_physical_address(out, gse.and_then(|g| g.address.as_ref()))
}

pub(crate) fn write_smv_control<W: Write>(
    out: &mut W,
    smv: &SampledValueControl,
    address: Option<&Address>,
) -> fmt::Result {
    write!(
        out,
        "SMVC({} {} {} {} {} {} {} {}",
        smv.name,
        non_empty(&smv.smv_id).unwrap_or("null"),
        non_empty(&smv.dat_set).unwrap_or("null"),
        count_or_zero(&smv.conf_rev),
        non_empty(&smv.smp_mod).unwrap_or("0"),
        count_or_zero(&smv.smp_rate),
        smv_opts_bits(smv.smv_opts.as_ref()),
        bit(parse_bool(smv.multicast.as_deref(), true)),
    )?;
    write_physical_address(out, address)
}

/// Closes a `GC`/`SMVC` argument list, adding a `PA(...)` block when the
/// address carries a decodable MAC.
fn write_physical_address<W: Write>(out: &mut W, address: Option<&Address>) -> fmt::Result {
    let pa = address.map(PhysicalAddress::from_address);
    match pa.as_ref().and_then(|pa| pa.mac_hex().map(|mac| (pa, mac))) {
        Some((pa, mac)) => {
            out.write_str("){\n")?;
            writeln!(out, "PA({} {} {} {});", pa.vlan_priority, pa.vlan_id, pa.app_id, mac)?;
            out.write_str("}\n")
        }
        None => out.write_str(");\n"),
    }
}
