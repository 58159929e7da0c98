//! Reactive state management

pub mod connector;

pub use connector::{provide_connector_context, use_connector_context, ConnectorContext, ConnectorHandle, WidgetOptions};
