//! Browser host: `requestAnimationFrame` ticks, `fetch` loading and a DOM
//! text sink.

use std::cell::RefCell;
use std::rc::Rc;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, error, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Event, MediaQueryListEvent, Response};

use crate::error::{ReelError, ReelResult, LOAD_FAILED_MESSAGE};
use crate::loader::{load_frames, parse_frames_json, FrameDataProvider};
use crate::rate::{FpsJitter, RatePresets};
use crate::scheduler::TickSource;
use crate::{Frame, FrameSequence, Orientation, Player, PlayerConfig};

type TickClosure = Closure<dyn FnMut(f64)>;
type SharedPlayer = Rc<RefCell<Player<RafTickSource>>>;

fn js_err(value: JsValue) -> ReelError {
    ReelError::web(format!("{value:?}"))
}

/// Tick source backed by `window.requestAnimationFrame`.
///
/// Clones share one installed callback, which receives the paint timestamp.
#[derive(Clone, Default)]
pub struct RafTickSource {
    callback: Rc<RefCell<Option<TickClosure>>>,
}

impl RafTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the function every requested animation frame calls.
    pub fn install(&self, on_tick: impl FnMut(f64) + 'static) {
        *self.callback.borrow_mut() = Some(Closure::new(on_tick));
    }
}

impl TickSource for RafTickSource {
    type Handle = i32;

    fn request_tick(&mut self) -> i32 {
        let slot = self.callback.borrow();
        let (Some(window), Some(callback)) = (web_sys::window(), slot.as_ref()) else {
            warn!("animation frame requested without a window or callback");
            return 0;
        };
        window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .unwrap_or_else(|err| {
                error!(?err, "requestAnimationFrame failed");
                0
            })
    }

    fn cancel_tick(&mut self, handle: i32) {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.cancel_animation_frame(handle) {
                warn!(?err, "cancelAnimationFrame failed");
            }
        }
    }
}

/// Fetches frames JSON over HTTP with `window.fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchProvider;

impl FrameDataProvider for FetchProvider {
    async fn fetch_frames(&self, url: &str) -> ReelResult<FrameSequence> {
        let window = web_sys::window().ok_or_else(|| ReelError::web("no window available"))?;
        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        if !response.ok() {
            return Err(ReelError::load(format!("HTTP {}", response.status())));
        }
        let body = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let text = body
            .as_string()
            .ok_or_else(|| ReelError::load("response body is not text"))?;
        parse_frames_json(&text)
    }
}

/// Writes frames into one `<pre>`-like element per orientation.
///
/// Elements are looked up on every write so late DOM changes are tolerated.
#[derive(Clone, Debug)]
pub struct TextSink {
    wide_id: String,
    narrow_id: String,
}

impl TextSink {
    pub fn new(wide_id: impl Into<String>, narrow_id: impl Into<String>) -> Self {
        Self {
            wide_id: wide_id.into(),
            narrow_id: narrow_id.into(),
        }
    }

    fn id(&self, orientation: Orientation) -> &str {
        match orientation {
            Orientation::Wide => &self.wide_id,
            Orientation::Narrow => &self.narrow_id,
        }
    }

    fn element(&self, orientation: Orientation) -> Option<Element> {
        web_sys::window()?
            .document()?
            .get_element_by_id(self.id(orientation))
    }

    /// Replace the element's text with `frame`.
    pub fn render(&self, orientation: Orientation, frame: &Frame) {
        if let Some(el) = self.element(orientation) {
            el.set_text_content(Some(&frame.to_text()));
        }
    }

    /// Render `frame` and mark the element `loaded`.
    pub fn reveal(&self, orientation: Orientation, frame: &Frame) -> ReelResult<()> {
        let el = self
            .element(orientation)
            .ok_or_else(|| ReelError::web(format!("missing #{} element", self.id(orientation))))?;
        el.set_text_content(Some(&frame.to_text()));
        el.class_list().add_1("loaded").map_err(js_err)?;
        Ok(())
    }

    /// Show the load failure message instead of the animation.
    pub fn fail(&self, orientation: Orientation) {
        if let Some(el) = self.element(orientation) {
            el.set_text_content(Some(LOAD_FAILED_MESSAGE));
        }
    }
}

fn orientation_for(matches_narrow: bool) -> Orientation {
    if matches_narrow {
        Orientation::Narrow
    } else {
        Orientation::Wide
    }
}

fn apply(player: &SharedPlayer, sink: &TextSink, orientation: Orientation) {
    let mut player = player.borrow_mut();
    let Some(frame) = player.show(orientation) else {
        return;
    };
    if let Err(err) = sink.reveal(orientation, frame) {
        error!(error = %err, "animation initialization failed");
        sink.fail(orientation);
    }
}

fn set_timeout(slot: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>, delay_ms: f64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(callback) = slot.borrow().as_ref() {
        if let Err(err) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), delay_ms as i32)
        {
            warn!(?err, "setTimeout failed");
        }
    }
}

fn schedule_jitter(player: SharedPlayer, jitter: FpsJitter) {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&slot);
    let mut rng = StdRng::from_entropy();
    let first_delay = jitter.next_delay_ms(&mut rng);

    *slot.borrow_mut() = Some(Closure::new(move || {
        let fps = jitter.jitter(player.borrow().base_fps(), &mut rng);
        player.borrow_mut().set_fps(fps);
        debug!(fps, "fps jittered");
        set_timeout(&next, jitter.next_delay_ms(&mut rng));
    }));
    set_timeout(&slot, first_delay);
}

fn install_rate_presets(player: &SharedPlayer, config: &PlayerConfig) -> ReelResult<()> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ReelError::web("no document available"))?;
    let presets = Rc::new(RefCell::new(RatePresets::new(config.presets.clone(), config.base_fps)));

    // Several elements may share the id
    let nodes = document.query_selector_all("#brand").map_err(js_err)?;
    for i in 0..nodes.length() {
        let Some(node) = nodes.get(i) else {
            continue;
        };
        let player = Rc::clone(player);
        let presets = Rc::clone(&presets);
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let fps = presets.borrow_mut().next();
            player.borrow_mut().set_fps(fps);
        });
        node.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(js_err)?;
        on_click.forget();
    }
    Ok(())
}

/// Load frames and start responsive playback in the current page.
///
/// Playback follows a `max-width` media query at `config.breakpoint_px`,
/// `#brand` clicks cycle the rate presets, and the rate jitters in the
/// background. A load failure replaces the animation with
/// [`LOAD_FAILED_MESSAGE`].
///
/// The fallback is written once, to the element for the orientation the page
/// starts in. Other setup errors are only returned.
pub async fn start(config: PlayerConfig, sink: TextSink) -> ReelResult<()> {
    config.validate()?;
    let window = web_sys::window().ok_or_else(|| ReelError::web("no window available"))?;

    let reduced_motion = config.reduced_motion
        || window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|mq| mq.matches());
    let narrow_query = window
        .match_media(&format!("(max-width: {}px)", config.breakpoint_px))
        .map_err(js_err)?
        .ok_or_else(|| ReelError::web("matchMedia unsupported"))?;
    let initial = orientation_for(narrow_query.matches());

    let frames = match load_frames(&FetchProvider, &config.frames_url).await {
        Ok(frames) => frames,
        Err(err) => {
            sink.fail(initial);
            return Err(err);
        }
    };

    let config = PlayerConfig {
        reduced_motion,
        ..config
    };
    let source = RafTickSource::new();
    let player: SharedPlayer = Rc::new(RefCell::new(Player::new(frames, &config, source.clone())));
    {
        let player = Rc::clone(&player);
        let sink = sink.clone();
        source.install(move |time| {
            let mut player = player.borrow_mut();
            let Some(orientation) = player.active() else {
                return;
            };
            if let Some(frame) = player.on_tick(time) {
                sink.render(orientation, frame);
            }
        });
    }

    if let Err(err) = install_rate_presets(&player, &config) {
        warn!(error = %err, "rate presets unavailable");
    }
    schedule_jitter(Rc::clone(&player), config.jitter.clone());
    apply(&player, &sink, initial);

    let on_change = {
        let player = Rc::clone(&player);
        let sink = sink.clone();
        Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
            apply(&player, &sink, orientation_for(event.matches()));
        })
    };
    narrow_query
        .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_change.forget();

    Ok(())
}

/// Run [`start`] on the browser's task queue, logging any setup failure.
pub fn spawn(config: PlayerConfig, sink: TextSink) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = start(config, sink).await {
            error!(error = %err, "animation setup failed");
        }
    });
}
