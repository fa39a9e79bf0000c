mod app;
mod config;
mod drift;
mod engine;
mod greeting;
mod input;
mod model;
mod quiz;
mod render;
mod view;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
