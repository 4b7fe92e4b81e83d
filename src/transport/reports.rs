use serde::Serialize;

use super::endpoint::{
    GET_DISPATCH_STATUS, GET_LIMIT, GET_MESSAGE_DETAILS, GET_MESSAGES_BY_DISPATCH, GET_NICK_LIST,
    GET_SMS_TOTALS, GET_TEMPLATE, GET_TEMPLATES,
};
use super::request::{BuildError, PreparedRequest, RequestBuilder};
use crate::domain::{DispatchId, DispatchQuery, MessageDetailsQuery, TotalsQuery};

#[derive(Debug, Serialize)]
struct MessageDetailsArgs {
    start_date: String,
    end_date: String,
    page_size: u32,
    count: u32,
}

#[derive(Debug, Serialize)]
struct DispatchArgs<'a> {
    user_id: u64,
    dispatch_id: &'a DispatchId,
}

#[derive(Debug, Serialize)]
struct TotalsArgs {
    year: i32,
    month: u32,
    is_global: u8,
}

pub fn encode_get_template(id: u64) -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_TEMPLATE).path_param("id", id).empty()
}

pub fn encode_get_templates() -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_TEMPLATES).empty()
}

pub fn encode_get_message_details(
    query: &MessageDetailsQuery,
) -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_MESSAGE_DETAILS).form(&MessageDetailsArgs {
        start_date: query.start_date.to_wire(),
        end_date: query.end_date.to_wire(),
        page_size: query.page_size,
        count: query.count,
    })
}

pub fn encode_get_messages_by_dispatch(
    query: &DispatchQuery,
) -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_MESSAGES_BY_DISPATCH).form(&DispatchArgs {
        user_id: query.user_id,
        dispatch_id: &query.dispatch_id,
    })
}

pub fn encode_get_dispatch_status(query: &DispatchQuery) -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_DISPATCH_STATUS).form(&DispatchArgs {
        user_id: query.user_id,
        dispatch_id: &query.dispatch_id,
    })
}

pub fn encode_get_nick_list() -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_NICK_LIST).empty()
}

pub fn encode_get_sms_totals(query: &TotalsQuery) -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_SMS_TOTALS).query(&TotalsArgs {
        year: query.year,
        month: query.month.value(),
        is_global: u8::from(query.is_global),
    })
}

pub fn encode_get_limit() -> Result<PreparedRequest, BuildError> {
    RequestBuilder::new(&GET_LIMIT).empty()
}
