//! Flutter bridge for NeedleReq core.

pub mod api;
