//! Hand-declared subset of the application's protobuf messages.
//!
//! Only the fields this client reads or writes are declared; protobuf skips
//! unknown fields on decode, so the remaining fields of each message are
//! ignored. Tags match the upstream `commands.proto` / `models.proto`.

use std::collections::BTreeMap;

use serde_json::Value;

/// `Rpc.*.Response.Error`. Code `0` means success for every operation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResponseError {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub description: ::prost::alloc::string::String,
}

/// `Rpc.Account.LocalLink.NewChallenge.Request`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NewChallengeRequest {
    #[prost(string, tag = "1")]
    pub app_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NewChallengeResponse {
    #[prost(message, optional, tag = "1")]
    pub error: ::core::option::Option<ResponseError>,
    #[prost(string, tag = "2")]
    pub challenge_id: ::prost::alloc::string::String,
}

/// `Rpc.Account.LocalLink.SolveChallenge.Request`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SolveChallengeRequest {
    #[prost(string, tag = "1")]
    pub challenge_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub answer: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SolveChallengeResponse {
    #[prost(message, optional, tag = "1")]
    pub error: ::core::option::Option<ResponseError>,
    #[prost(string, tag = "2")]
    pub session_token: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub app_key: ::prost::alloc::string::String,
}

/// `Rpc.Wallet.CreateSession.Request`, `appKey` arm of the `auth` oneof.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateSessionRequest {
    #[prost(string, tag = "2")]
    pub app_key: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateSessionResponse {
    #[prost(message, optional, tag = "1")]
    pub error: ::core::option::Option<ResponseError>,
    #[prost(string, tag = "2")]
    pub token: ::prost::alloc::string::String,
}

/// `Rpc.Object.SearchWithMeta.Request`. Filters and sorts are left empty.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchWithMetaRequest {
    #[prost(string, tag = "3")]
    pub full_text: ::prost::alloc::string::String,
    #[prost(int32, tag = "4")]
    pub offset: i32,
    #[prost(int32, tag = "5")]
    pub limit: i32,
    #[prost(bool, tag = "8")]
    pub return_meta: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchWithMetaResponse {
    #[prost(message, optional, tag = "1")]
    pub error: ::core::option::Option<ResponseError>,
    #[prost(message, repeated, tag = "2")]
    pub results: ::prost::alloc::vec::Vec<SearchResultRecord>,
}

/// `Model.Search.Result`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchResultRecord {
    #[prost(string, tag = "1")]
    pub object_id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub details: ::core::option::Option<::prost_types::Struct>,
    #[prost(message, repeated, tag = "3")]
    pub meta: ::prost::alloc::vec::Vec<SearchMeta>,
}

/// `Model.Search.Meta`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchMeta {
    #[prost(string, tag = "1")]
    pub highlight: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub block_id: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub relation_key: ::prost::alloc::string::String,
}

/// Convert a protobuf `Struct` into a JSON object map.
#[must_use]
pub fn struct_to_map(details: ::prost_types::Struct) -> BTreeMap<String, Value> {
    details
        .fields
        .into_iter()
        .map(|(key, value)| (key, value_to_json(value)))
        .collect()
}

/// Convert a protobuf `Value` into JSON. Non-finite numbers become `null`.
#[must_use]
pub fn value_to_json(value: ::prost_types::Value) -> Value {
    use ::prost_types::value::Kind;

    match value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::NumberValue(n)) => serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::StructValue(s)) => Value::Object(
            s.fields
                .into_iter()
                .map(|(key, value)| (key, value_to_json(value)))
                .collect(),
        ),
        Some(Kind::ListValue(list)) => {
            Value::Array(list.values.into_iter().map(value_to_json).collect())
        }
    }
}
