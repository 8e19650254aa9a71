use bars_core::analyzer;
use bars_core::render;
use sfml::{graphics, system};
use sfml::window::{mouse, Event, Key};

fn main() {
    use sfml::graphics::RenderTarget;
    use sfml::graphics::Shape;
    use sfml::graphics::Transformable;

    bars_core::default_config();
    bars_core::default_log();

    let width: u32 = bars_core::CONFIG.get_or("window.width", 1600);
    let height: u32 = bars_core::CONFIG.get_or("window.height", 800);

    let context_settings = sfml::window::ContextSettings {
        antialiasing_level: 4,
        ..Default::default()
    };

    let mut window = graphics::RenderWindow::new(
        (width, height),
        "Rainbow Bars",
        sfml::window::Style::CLOSE,
        &context_settings,
    );
    window.set_vertical_sync_enabled(true);
    window.clear(graphics::Color::BLACK);
    window.display();

    let mut player = bars_core::playback::PlayerBuilder::new()
        .build()
        .expect("Can't set up playback");

    let mut sampler = analyzer::ByteFrequencyBuilder::new().plan();
    let params = render::RenderParams::new(width as f32, height as f32);

    // The two reusable per-frame buffers
    let mut freqs = vec![0u8; sampler.bin_count()];
    let mut rects = Vec::new();

    // Start control, top left like a page button
    let control = graphics::Rect::new(10.0, 10.0, 200.0, 60.0);
    let mut control_shape = graphics::RectangleShape::new();
    control_shape.set_position(system::Vector2f::new(control.left, control.top));
    control_shape.set_size(system::Vector2f::new(control.width, control.height));
    control_shape.set_fill_color(graphics::Color::TRANSPARENT);
    control_shape.set_outline_color(graphics::Color::WHITE);
    control_shape.set_outline_thickness(1.0);

    // Idle until the user clicks the control (or hits Space)
    'wait: loop {
        while let Some(event) = window.poll_event() {
            match event {
                Event::Closed => return,
                Event::KeyPressed {
                    code: Key::Escape, ..
                } => return,
                Event::KeyPressed {
                    code: Key::Space, ..
                } => break 'wait,
                Event::MouseButtonPressed {
                    button: mouse::Button::Left,
                    x,
                    y,
                } => {
                    if control.contains2(x as f32, y as f32) {
                        break 'wait;
                    }
                }
                _ => (),
            }
        }

        window.clear(graphics::Color::BLACK);
        window.draw(&control_shape);
        window.display();
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    player.play();
    log::info!("Playback started");

    let mut frames = bars_core::Frames::new();
    let stop = frames.stop_handle();

    let mut fade = graphics::RectangleShape::new();
    fade.set_size(system::Vector2f::new(width as f32, height as f32));
    fade.set_fill_color(graphics::Color::rgba(0, 0, 0, params.fade_alpha));

    let mut bar = graphics::RectangleShape::new();

    'main: for frame in frames.iter() {
        log::trace!("Frame: {:7}@{:.3}", frame.frame, frame.time);

        while let Some(event) = window.poll_event() {
            match event {
                Event::Closed
                | Event::KeyPressed {
                    code: Key::Escape, ..
                } => {
                    player.dispose();
                    stop.stop();
                    continue 'main;
                }
                _ => (),
            }
        }

        // A tick that finds the tap gone or the sampler not ready is a no-op
        let ready = match player.tap() {
            Some(buf) => sampler.sample_into(buf, &mut freqs),
            None => false,
        };
        if !ready {
            continue;
        }

        render::frame_geometry(&params, &freqs, &mut rects);

        // Fade-erase instead of a hard clear, leaves the trail
        window.draw(&fade);

        for rect in &rects {
            let (r, g, b) = render::hsl_to_rgb(rect.hue, 1.0, 0.5);
            bar.set_fill_color(graphics::Color::rgb(r, g, b));
            bar.set_position(system::Vector2f::new(rect.x, rect.y));
            bar.set_size(system::Vector2f::new(rect.width, rect.height));
            window.draw(&bar);
        }

        window.display();
    }

    player.dispose();
}
