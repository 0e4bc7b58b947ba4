//! Observability setup for Pickems: the tracing subscriber and its optional
//! OpenTelemetry bridge.

pub mod tracing_setup;
