mod app;
mod auth;
mod bridge;
mod calc;
mod model;
mod storage;

use app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
