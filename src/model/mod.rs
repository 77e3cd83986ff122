pub use ecogrid_core::{Chance, Draw, Scripted, SimRng};
pub use ecogrid_data::{Census, Coord, Entity, GridSnapshot, Kind};
pub mod config {
    pub use ecogrid_core::config::*;
}
pub mod error {
    pub use ecogrid_core::error::*;
}
pub mod grid {
    pub use ecogrid_core::grid::*;
}
pub mod rules {
    pub use ecogrid_core::rules::*;
}
pub mod scheduler {
    pub use ecogrid_core::scheduler::*;
}
pub mod session {
    pub use ecogrid_core::session::*;
}
pub mod metrics {
    pub use ecogrid_core::metrics::*;
}
