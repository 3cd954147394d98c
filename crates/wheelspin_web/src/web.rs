use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use wheelspin::fmt::{fmt_degrees, fmt_fixed};
use wheelspin::prelude::*;
use wheelspin::selection::normalize_degrees;

use crate::ui_model::{
    can_spin, container_size, parse_duration_s, parse_entries, parse_rotation_deg, press_gesture,
    EditorGesture, CURVE_CANVAS_H, CURVE_CANVAS_W, DEFAULT_ENTRIES,
};

mod canvas;
mod frame_loop;
mod storage;

use canvas::CanvasSurface;
use frame_loop::FrameLoop;

pub(crate) const LOCALSTORAGE_SETTINGS_KEY: &str = "wheelspin.settings.v1";
pub(crate) const LOCALSTORAGE_ENTRIES_KEY: &str = "wheelspin.entries.v1";

const FALLBACK_WHEEL_SIZE: (f64, f64) = (640.0, 400.0);

pub fn start() {
    mount_to_body(|| view! { <App /> });
}

fn log_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

/// Everything the widget mutates, behind one local store.
struct WheelApp {
    engine: SpinEngine,
    renderer: WheelRenderer<CanvasSurface>,
    wheel: Option<CanvasSurface>,
    curve: Option<CanvasSurface>,
}

impl WheelApp {
    fn new() -> Self {
        let settings = storage::load_settings().unwrap_or_default();
        Self {
            engine: SpinEngine::new(settings),
            renderer: WheelRenderer::new(FALLBACK_WHEEL_SIZE.0, FALLBACK_WHEEL_SIZE.1),
            wheel: None,
            curve: None,
        }
    }

    fn set_entries_text(&mut self, text: &str) -> bool {
        if !self.engine.set_entries(entries_from_labels(parse_entries(text))) {
            return false;
        }
        self.renderer.set_entries(self.engine.entries());
        true
    }

    fn draw_wheel(&mut self) {
        let rotation = self.engine.rotation_deg();
        let Some(target) = self.wheel.as_mut() else {
            return;
        };
        if let Err(e) = self.renderer.render(target, rotation) {
            log_error(&format!("wheelspin: {e}"));
        }
    }

    fn draw_curve(&mut self) {
        if !self.engine.editor().needs_redraw() {
            return;
        }
        if let Some(surface) = self.curve.as_mut() {
            self.engine.editor_mut().render(surface);
        }
    }

    fn resize_wheel(&mut self, width: f64, height: f64) {
        if let Some(surface) = self.wheel.as_mut() {
            if let Err(e) = surface.resize(width, height, device_pixel_ratio()) {
                log_error(&e);
            }
        }
        self.renderer.resize(width, height);
        self.draw_wheel();
    }

    fn readout(&self) -> String {
        self.engine
            .current_entry()
            .map(|e| e.label.clone())
            .unwrap_or_default()
    }

    fn save_settings(&self) {
        storage::save_settings(&self.engine.settings());
    }
}

/// Keeps the observer and its callback alive until cleanup.
struct ResizeWatch {
    observer: web_sys::ResizeObserver,
    _callback: Closure<dyn FnMut()>,
}

#[component]
fn App() -> impl IntoView {
    let app = StoredValue::new_local(WheelApp::new());
    let frame_loop = StoredValue::new_local(None::<FrameLoop>);
    let resize_watch = StoredValue::new_local(None::<ResizeWatch>);

    let initial_entries = storage::load_entries_text().unwrap_or_else(|| DEFAULT_ENTRIES.to_string());
    app.update_value(|a| {
        a.set_entries_text(&initial_entries);
    });

    let (entries_text, set_entries_text) = signal(initial_entries);
    let (entry_count, set_entry_count) = signal(app.with_value(|a| a.engine.entries().len()));
    let (duration_text, set_duration_text) =
        signal(app.with_value(|a| fmt_fixed(a.engine.duration_s(), 1)));
    let (spinning, set_spinning) = signal(false);
    let (rotation, set_rotation) = signal(0.0f64);
    let (readout, set_readout) = signal(app.with_value(|a| a.readout()));
    let (last_result, set_last_result) = signal(String::new());
    let (status, set_status) = signal(String::new());

    let wheel_box = NodeRef::<leptos::html::Div>::new();
    let wheel_canvas = NodeRef::<leptos::html::Canvas>::new();
    let curve_canvas = NodeRef::<leptos::html::Canvas>::new();

    let refresh_readout = move || {
        let label = app.with_value(|a| a.readout());
        if readout.get_untracked() != label {
            set_readout.set(label);
        }
    };

    let tick = move |timestamp: f64| -> bool {
        let mut out = None;
        app.update_value(|a| {
            let report = a.engine.frame(timestamp);
            a.draw_wheel();
            out = Some((report, a.readout(), a.engine.is_spinning()));
        });
        let Some((report, label, still_spinning)) = out else {
            return false;
        };
        if readout.get_untracked() != label {
            set_readout.set(label);
        }
        set_rotation.set(normalize_degrees(report.rotation_deg));
        if let Some(done) = report.completed {
            set_last_result.set(done.label);
        }
        if !still_spinning {
            set_spinning.set(false);
        }
        still_spinning
    };

    let do_spin = move || {
        if spinning.get_untracked() {
            return;
        }
        let now = performance_now();
        let mut result = None;
        app.update_value(|a| {
            result = Some(a.engine.spin(now, &mut js_sys::Math::random));
        });
        match result {
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                set_status.set(e.to_string());
                return;
            }
            None => return,
        }
        set_status.set(String::new());
        set_spinning.set(true);
        let on_stall = move |reason: String| {
            app.update_value(|a| {
                a.engine.abandon();
            });
            set_spinning.set(false);
            set_status.set(reason);
        };
        match FrameLoop::start(tick, on_stall) {
            Ok(l) => frame_loop.update_value(|slot| {
                if let Some(old) = slot.replace(l) {
                    old.stop();
                }
            }),
            Err(e) => {
                app.update_value(|a| {
                    a.engine.abandon();
                });
                set_spinning.set(false);
                set_status.set(e);
            }
        }
    };

    let on_entries_input = move |text: String| {
        let mut accepted = false;
        app.update_value(|a| {
            accepted = a.set_entries_text(&text);
            if accepted {
                a.draw_wheel();
            }
        });
        if accepted {
            storage::save_entries_text(&text);
            set_entry_count.set(app.with_value(|a| a.engine.entries().len()));
            refresh_readout();
        }
        set_entries_text.set(text);
    };

    let on_duration_change = move |raw: String| {
        let Some(seconds) = parse_duration_s(&raw) else {
            set_status.set(format!("invalid duration: {raw}"));
            return;
        };
        app.update_value(|a| {
            a.engine.set_duration_s(seconds);
            a.draw_curve();
            a.save_settings();
        });
        set_duration_text.set(fmt_fixed(seconds, 1));
    };

    let on_rotation_input = move |raw: String| {
        let Some(deg) = parse_rotation_deg(&raw) else {
            return;
        };
        let mut moved = false;
        app.update_value(|a| {
            moved = a.engine.set_rotation(deg);
            if moved {
                a.draw_wheel();
            }
        });
        if moved {
            set_rotation.set(normalize_degrees(deg));
            refresh_readout();
        }
    };

    let curve_press = move |button: i16, double_click: bool, x: f64, y: f64| {
        match press_gesture(button, double_click, spinning.get_untracked()) {
            EditorGesture::Grab => app.update_value(|a| {
                a.engine.editor_mut().begin_drag(x, y);
                a.draw_curve();
            }),
            EditorGesture::Remove => app.update_value(|a| {
                if a.engine.editor_mut().remove_near(x, y) {
                    a.draw_curve();
                    a.save_settings();
                }
            }),
            EditorGesture::Ignore => {}
        }
    };

    let curve_move = move |x: f64, y: f64| {
        if spinning.get_untracked() {
            return;
        }
        app.update_value(|a| {
            if a.engine.editor_mut().drag_to(x, y) {
                a.draw_curve();
            }
        });
    };

    let curve_release = move || {
        app.update_value(|a| {
            if a.engine.editor().dragging().is_some() {
                a.engine.editor_mut().end_drag();
                a.draw_curve();
                a.save_settings();
            }
        });
    };

    let reset_curve = move || {
        if spinning.get_untracked() {
            return;
        }
        app.update_value(|a| {
            a.engine.editor_mut().reset();
            a.draw_curve();
            a.save_settings();
        });
    };

    // Attach canvases once the elements exist.
    Effect::new(move |_| {
        let (Some(container), Some(wheel_el), Some(curve_el)) =
            (wheel_box.get(), wheel_canvas.get(), curve_canvas.get())
        else {
            return;
        };
        if app.with_value(|a| a.wheel.is_some()) {
            return;
        }

        let rect = container.get_bounding_client_rect();
        let (w, h) = container_size(rect.width(), rect.height()).unwrap_or(FALLBACK_WHEEL_SIZE);
        let dpr = device_pixel_ratio();
        app.update_value(|a| {
            match CanvasSurface::new(wheel_el, w, h, dpr) {
                Ok(s) => a.wheel = Some(s),
                Err(e) => log_error(&e),
            }
            match CanvasSurface::new(curve_el, CURVE_CANVAS_W, CURVE_CANVAS_H, dpr) {
                Ok(s) => a.curve = Some(s),
                Err(e) => log_error(&e),
            }
            a.renderer.resize(w, h);
            a.draw_wheel();
            a.draw_curve();
        });

        let observed = container.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            let rect = observed.get_bounding_client_rect();
            if let Some((w, h)) = container_size(rect.width(), rect.height()) {
                let changed = app.with_value(|a| {
                    let l = a.renderer.layout();
                    l.width != w || l.height != h
                });
                if changed {
                    app.update_value(|a| a.resize_wheel(w, h));
                }
            }
        });
        match web_sys::ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&container);
                resize_watch.update_value(|slot| {
                    *slot = Some(ResizeWatch {
                        observer,
                        _callback: callback,
                    })
                });
            }
            Err(_) => log_error("wheelspin: ResizeObserver unavailable"),
        }
    });

    on_cleanup(move || {
        frame_loop.update_value(|slot| {
            if let Some(l) = slot.take() {
                l.stop();
            }
        });
        app.update_value(|a| {
            a.engine.abandon();
        });
        resize_watch.update_value(|slot| {
            if let Some(watch) = slot.take() {
                watch.observer.disconnect();
            }
        });
    });

    view! {
        <main style="font-family: system-ui, -apple-system, Segoe UI, Roboto, sans-serif; padding: 18px; max-width: 1100px; margin: 0 auto; color: #e5e7eb; background: #0a0f1a;">
            <h1 style="margin: 0 0 12px 0;">"Prize wheel"</h1>

            <section style="display: flex; gap: 18px; flex-wrap: wrap; align-items: flex-start;">
                <div style="display: flex; flex-direction: column; gap: 8px; min-width: 220px;">
                    <label for="entries">"Entries (one per line)"</label>
                    <textarea
                        id="entries"
                        rows="10"
                        disabled=move || spinning.get()
                        prop:value=move || entries_text.get()
                        on:input=move |ev| on_entries_input(event_target_value(&ev))
                    ></textarea>

                    <label for="duration">"Spin duration (s)"</label>
                    <input
                        id="duration"
                        type="number"
                        min="0.5"
                        max="60"
                        step="0.5"
                        prop:value=move || duration_text.get()
                        on:change=move |ev| on_duration_change(event_target_value(&ev))
                    />

                    <button
                        disabled=move || !can_spin(spinning.get(), entry_count.get())
                        on:click=move |_| do_spin()
                    >
                        "Spin"
                    </button>

                    <label for="rotation">"Rotation " {move || fmt_degrees(rotation.get())}</label>
                    <input
                        id="rotation"
                        type="range"
                        min="0"
                        max="359.9"
                        step="0.1"
                        disabled=move || spinning.get()
                        prop:value=move || fmt_fixed(rotation.get(), 1)
                        on:input=move |ev| on_rotation_input(event_target_value(&ev))
                    />

                    <div>"Pointer: " <strong>{move || readout.get()}</strong></div>
                    <div>"Last result: " <strong>{move || last_result.get()}</strong></div>
                    <div style="color: #fb7185;">{move || status.get()}</div>
                </div>

                <div
                    node_ref=wheel_box
                    style="position: relative; flex: 1 1 480px; height: 420px; min-width: 320px;"
                >
                    <canvas
                        node_ref=wheel_canvas
                        style="position: absolute; inset: 0; width: 100%; height: 100%;"
                    ></canvas>
                </div>
            </section>

            <section style="margin-top: 16px;">
                <div style="display: flex; gap: 10px; align-items: center; margin-bottom: 6px;">
                    <strong>"Speed curve"</strong>
                    <button disabled=move || spinning.get() on:click=move |_| reset_curve()>
                        "Reset"
                    </button>
                    <span style="color: #9ca3af;">
                        "Click to add or drag points; right-click or double-click removes one."
                    </span>
                </div>
                <canvas
                    node_ref=curve_canvas
                    style=format!("width: {CURVE_CANVAS_W}px; height: {CURVE_CANVAS_H}px; touch-action: none;")
                    on:pointerdown=move |ev: web_sys::PointerEvent| {
                        curve_press(ev.button(), false, ev.offset_x() as f64, ev.offset_y() as f64)
                    }
                    on:pointermove=move |ev: web_sys::PointerEvent| {
                        curve_move(ev.offset_x() as f64, ev.offset_y() as f64)
                    }
                    on:pointerup=move |_| curve_release()
                    on:pointerleave=move |_| curve_release()
                    on:dblclick=move |ev: web_sys::MouseEvent| {
                        curve_press(ev.button(), true, ev.offset_x() as f64, ev.offset_y() as f64)
                    }
                    on:contextmenu=move |ev: web_sys::MouseEvent| ev.prevent_default()
                ></canvas>
            </section>
        </main>
    }
}
