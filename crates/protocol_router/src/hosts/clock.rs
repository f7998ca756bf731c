//! `clock` host: fields of the tick time
//!
//! `ddb://clock` → `{unix, year, month, day, hour, minute, second, weekday, day_of_year}` (UTC)

use chrono::{Datelike, Timelike};
use serde_json::json;

use crate::error::Result;
use crate::handler::HandlerReply;
use crate::table::RouteTableBuilder;
use crate::{BoundArgs, ContextKind};

pub const HOST: &str = "clock";

pub fn register(builder: &mut RouteTableBuilder) -> Result<()> {
    builder.route(HOST, "", &[ContextKind::Timestamp], now)?;
    Ok(())
}

fn now(args: BoundArgs) -> HandlerReply {
    let ts = match args.timestamp(0) {
        Ok(ts) => ts,
        Err(e) => return HandlerReply::failed(e),
    };
    HandlerReply::ready(json!({
        "unix": ts.timestamp(),
        "year": ts.year(),
        "month": ts.month(),
        "day": ts.day(),
        "hour": ts.hour(),
        "minute": ts.minute(),
        "second": ts.second(),
        "weekday": ts.weekday().number_from_monday(),
        "day_of_year": ts.ordinal(),
    }))
}
