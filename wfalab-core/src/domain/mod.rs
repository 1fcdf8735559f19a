//! Domain types — bars, series, parameter sets, signals.

pub mod bar;
pub mod params;
pub mod series;
pub mod signal;

pub use bar::Bar;
pub use params::ParameterSet;
pub use series::{BarSeries, SeriesError};
pub use signal::{Direction, PositionState, SignalAction, TradeSignal};
