pub mod engine;
pub mod layout;
pub mod model;
pub mod response;
pub mod transport_network;

pub use engine::route_planner::{PlannerParams, RoutePlanner};
pub use layout::NetworkLayout;
pub use model::{Id, Line, PassengerEvent, PassengerEventKind, Route, Station};
pub use response::{Step, TravelRoute};
pub use transport_network::{
    HydrationError, NetworkQueryError, NetworkUpdateError, TransportNetwork,
};

pub use tracing;
