//! Mind map REST service.
//!
//! Exposes one [`Editor`](crate::editor::Editor) over HTTP.
//!
//! ## Endpoints
//!
//! - `GET /api/graph` - Current map, fingerprint and UI state
//! - `POST /api/nodes` - Add a root (opens a color picker)
//! - `POST /api/nodes/:id/children` - Add a child, optionally via the color prompt
//! - `DELETE /api/nodes/:id` - Delete a node and its edges
//! - `PUT /api/nodes/:id/{color,label,description,position}` - Edit node fields
//! - `POST /api/nodes/:id/select` - Select a node
//! - `POST /api/edges` - Connect two nodes
//! - `POST /api/color/confirm` - Confirm the open color picker
//! - `POST /api/color/cancel` - Close the open color picker
//! - `GET /api/slides` - Slides for presentation mode
//! - `GET /api/export/:format` - Download as json, txt or pdf
//! - `POST /api/import` - Replace the map with a JSON document
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, record_export, record_import};
pub use routes::{create_router, AppState};
pub use state::{ConfigError, ServiceConfig, ServiceState};
