//! Arcade game policies
//!
//! Each game implements [`TickGame`](crate::sim::TickGame) and is driven by an
//! [`Engine`](crate::sim::Engine). The merge puzzle has no clock and lives in
//! [`crate::grid`] instead.

pub mod cars;
pub mod flappy;
pub mod mole;
pub mod pong;
pub mod snake;

pub use cars::{Cars, CarsView, Obstacle};
pub use flappy::{FlappyBird, FlappyIntent, FlappyView, Pipe};
pub use mole::{MoleView, WhackAMole};
pub use pong::{Ball, PingPong, PongView};
pub use snake::{Snake, SnakeView};
