//! Plays an intro and a round of demo animations on the headless
//! toolkit. Run with `RUST_LOG=motionrx_core=debug` to follow every
//! toolkit animation.

use core::time::Duration;
use std::cell::Cell;
use std::rc::Rc;

use bevy_color::Srgba;
use bevy_math::{UVec2, Vec2};
use motionrx_view::headless::{Headless, ViewState};
use motionrx_view::prelude::*;
use tracing_subscriber::EnvFilter;

const ANIMATION_DURATION: u64 = 1000;

fn main() -> Result<(), AnimationError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let toolkit =
        Headless::new().with_frame(Duration::from_millis(16));
    let spawn = |state: ViewState| {
        ViewAnimator::new(toolkit.clone(), toolkit.spawn(state))
    };

    let card = spawn(ViewState::default().with_scale(0.0));
    let fab = spawn(ViewState::default().with_scale(0.0));
    let text = spawn(
        ViewState::default().with_alpha(0.0).with_text("Hello"),
    );
    let progress = spawn(ViewState::default().with_alpha(0.0));
    let primary = Srgba::hex("#3F51B5").unwrap_or(Srgba::BLUE);
    let accent = Srgba::hex("#FF4081").unwrap_or(Srgba::RED);
    let button = spawn(
        ViewState::default()
            .with_size(UVec2::new(120, 48))
            .with_origin(Vec2::new(16.0, 16.0))
            .with_background(primary),
    );

    let tween = || Tween::millis(ANIMATION_DURATION);

    let intro = sequentially([
        card.scale(1.0, tween()),
        fab.scale(1.0, tween()),
        together([
            fab.rotation(360.0, tween()),
            text.fade_in(tween()),
        ]),
        progress.fade_in(tween()),
    ]);
    let elapsed = toolkit.run(intro)?;
    tracing::info!(?elapsed, "intro done");

    let radius = Rc::new(Cell::new(0.0));
    let demos = [
        ("alpha", button.fade_out(tween().reversed())),
        (
            "translation",
            button.translation(500.0, 500.0, tween().reversed()),
        ),
        ("scale", button.scale(0.0, tween().reversed())),
        ("rotation", button.rotation(360.0, tween().reversed())),
        (
            "background",
            button.background_color(
                primary,
                accent,
                tween().reversed(),
            ),
        ),
        ("resize", button.resize(0, 0, tween().reversed())),
        ("shake", button.shake()),
        ("press", button.press()),
        (
            "custom",
            range_float(
                &toolkit,
                button.defaults(),
                (0.0, 30.0),
                tween().reversed(),
                {
                    let radius = radius.clone();
                    move |dp| radius.set(dp)
                },
            ),
        ),
        ("text", text.text("Amazing", tween().reversed())),
    ];

    for (name, demo) in demos {
        let elapsed = toolkit.run(demo)?;
        tracing::info!(name, ?elapsed, "demo done");
    }

    let state = toolkit.state(button.view())?;
    let radius = radius.get();
    tracing::info!(?state, radius, "final button state");
    Ok(())
}
