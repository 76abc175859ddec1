use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Mat4;
use js_sys::Float32Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    window, Document, Event, EventTarget, HtmlCanvasElement, MouseEvent,
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
    WebGlVertexArrayObject,
};

use super::dom::{self, DomAnchors};
use super::error::MountError;
use super::listeners::{with_state, AnimationLoop, EventListener};
use crate::config::TrailConfig;
use crate::input::PointerSample;
use crate::projection::Viewport;
use crate::simulation::TrailSimulation;
use crate::snapshot::RenderBuffers;

const VERTEX_SHADER: &str = include_str!("shaders/points.vert");
const FRAGMENT_SHADER: &str = include_str!("shaders/points.frag");

/// Components per vertex for position, color, size and alpha.
const ATTRIBUTES: [i32; 4] = [3, 3, 1, 1];

/// Upper bound on backing-store pixels per CSS pixel.
const MAX_PIXEL_RATIO: f64 = 2.0;

/// Point-sprite program with one buffer per attribute.
struct PointRenderer {
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    u_view_proj: Option<WebGlUniformLocation>,
    u_point_scale: Option<WebGlUniformLocation>,
    u_ring: Option<WebGlUniformLocation>,
}

impl PointRenderer {
    fn new(gl: GL) -> Result<Self, MountError> {
        let vert = compile_shader(&gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
        let frag = compile_shader(&gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vert, &frag)?;
        gl.delete_shader(Some(&vert));
        gl.delete_shader(Some(&frag));

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| MountError::Js("create_vertex_array failed".into()))?;
        gl.bind_vertex_array(Some(&vao));

        let mut buffers = Vec::with_capacity(ATTRIBUTES.len());
        for (location, &components) in ATTRIBUTES.iter().enumerate() {
            let buffer = gl
                .create_buffer()
                .ok_or_else(|| MountError::Js("create_buffer failed".into()))?;
            gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
            gl.enable_vertex_attrib_array(location as u32);
            gl.vertex_attrib_pointer_with_i32(location as u32, components, GL::FLOAT, false, 0, 0);
            buffers.push(buffer);
        }
        gl.bind_vertex_array(None);

        gl.enable(GL::BLEND);
        gl.blend_func(GL::ONE, GL::ONE);
        gl.disable(GL::DEPTH_TEST);

        Ok(Self {
            u_view_proj: gl.get_uniform_location(&program, "u_view_proj"),
            u_point_scale: gl.get_uniform_location(&program, "u_point_scale"),
            u_ring: gl.get_uniform_location(&program, "u_ring"),
            gl,
            program,
            vao,
            buffers,
        })
    }

    fn begin(&self, width: i32, height: i32, view_proj: &Mat4, point_scale: f32) {
        let gl = &self.gl;
        gl.viewport(0, 0, width, height);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(
            self.u_view_proj.as_ref(),
            false,
            &view_proj.to_cols_array(),
        );
        gl.uniform1f(self.u_point_scale.as_ref(), point_scale);
    }

    fn draw(&self, points: &RenderBuffers, ring: bool) {
        if points.is_empty() {
            return;
        }
        let gl = &self.gl;
        gl.bind_vertex_array(Some(&self.vao));
        let data = [&points.positions, &points.colors, &points.sizes, &points.alphas];
        for (buffer, values) in self.buffers.iter().zip(data) {
            gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
            let array = Float32Array::from(values.as_slice());
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::DYNAMIC_DRAW);
        }
        gl.uniform1f(self.u_ring.as_ref(), if ring { 1.0 } else { 0.0 });
        gl.draw_arrays(GL::POINTS, 0, points.len() as i32);
        gl.bind_vertex_array(None);
    }

    fn release(&self) {
        let gl = &self.gl;
        for buffer in &self.buffers {
            gl.delete_buffer(Some(buffer));
        }
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_program(Some(&self.program));
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, MountError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| MountError::Shader("create_shader failed".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(MountError::Shader(log))
    }
}

fn link_program(
    gl: &GL,
    vert: &WebGlShader,
    frag: &WebGlShader,
) -> Result<WebGlProgram, MountError> {
    let program = gl
        .create_program()
        .ok_or_else(|| MountError::Link("create_program failed".into()))?;
    gl.attach_shader(&program, vert);
    gl.attach_shader(&program, frag);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(MountError::Link(log))
    }
}

/// Everything the event and frame callbacks share.
struct Mounted {
    sim: TrailSimulation,
    renderer: PointRenderer,
    canvas: HtmlCanvasElement,
    anchors: DomAnchors,
    hover_selector: String,
    pixel_ratio: f32,
    last_frame: Option<f64>,
}

impl Mounted {
    /// Resize canvas to fit window
    fn resize(&mut self) {
        let Some(win) = window() else { return };
        let css_w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let css_h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let ratio = win.device_pixel_ratio().clamp(1.0, MAX_PIXEL_RATIO);
        self.canvas.set_width((css_w * ratio) as u32);
        self.canvas.set_height((css_h * ratio) as u32);
        self.pixel_ratio = ratio as f32;
        self.sim.resize(Viewport::new(css_w as f32, css_h as f32));
    }

    fn tick(&mut self, now: f64) {
        let dt = match self.last_frame.replace(now) {
            Some(prev) => ((now - prev) / 1000.0) as f32,
            None => 0.0,
        };

        let viewport = self.sim.viewport();
        let projection = self.sim.config().projection;
        let view_proj = projection.view_projection(&viewport);
        let point_scale = projection.pixels_per_world_unit(&viewport) * self.pixel_ratio;

        let frame = self.sim.frame(dt, &self.anchors);
        self.renderer.begin(
            self.canvas.width() as i32,
            self.canvas.height() as i32,
            &view_proj,
            point_scale,
        );
        self.renderer.draw(frame.trail, false);
        self.renderer.draw(frame.overlay, false);
        self.renderer.draw(frame.ripple, true);
    }
}

struct Mount {
    state: Rc<RefCell<Mounted>>,
    listeners: Vec<EventListener>,
    frames: AnimationLoop,
    document: Document,
}

/// Owner of a mounted trail. Unmounting (explicitly or on drop) removes all
/// listeners, cancels the pending frame and restores the native cursor.
#[wasm_bindgen]
pub struct TrailHandle {
    inner: Option<Mount>,
}

#[wasm_bindgen]
impl TrailHandle {
    /// Idempotent.
    pub fn unmount(&mut self) {
        let Some(mut mount) = self.inner.take() else {
            return;
        };
        mount.frames.cancel();
        mount.listeners.clear();
        dom::restore_system_cursor(&mount.document);
        if let Ok(state) = mount.state.try_borrow() {
            state.renderer.release();
        }
        log::info!("cursor trail unmounted");
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.inner.is_some()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.inner
            .as_ref()
            .and_then(|m| m.state.try_borrow().ok().map(|s| s.sim.pool().len()))
            .unwrap_or(0)
    }
}

impl Drop for TrailHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mounts the trail on `canvas`. `config` is an optional JSON override; when
/// absent the canvas `data-trail-*` attributes are used.
#[wasm_bindgen]
pub fn mount(canvas: HtmlCanvasElement, config: Option<String>) -> Result<TrailHandle, JsValue> {
    let config = match config {
        Some(json) => TrailConfig::from_json_str(&json).map_err(MountError::from)?,
        None => dom::config_from_canvas(&canvas)?,
    };
    Ok(start(canvas, config)?)
}

pub fn start(canvas: HtmlCanvasElement, config: TrailConfig) -> Result<TrailHandle, MountError> {
    let win = window().ok_or(MountError::MissingWindow)?;
    let document = win.document().ok_or(MountError::MissingDocument)?;

    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or(MountError::WebGl2Unsupported)?
        .dyn_into()
        .map_err(|_| MountError::WebGl2Unsupported)?;

    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64;
    let anchors = DomAnchors::new(document.clone(), config.magnetic_selector.clone());
    let hover_selector = config.hover_selector.clone();
    let sim = TrailSimulation::new(config, seed)?;

    let state = Rc::new(RefCell::new(Mounted {
        sim,
        renderer: PointRenderer::new(gl)?,
        canvas,
        anchors,
        hover_selector,
        pixel_ratio: 1.0,
        last_frame: None,
    }));
    state.borrow_mut().resize();

    let listeners = register_listeners(&win, &document, Rc::downgrade(&state))?;

    let frames = {
        let state = Rc::downgrade(&state);
        AnimationLoop::start(move |now| with_state(&state, |s| s.tick(now)))?
    };

    dom::hide_system_cursor(&document);
    log::info!("cursor trail mounted");

    Ok(TrailHandle {
        inner: Some(Mount {
            state,
            listeners,
            frames,
            document,
        }),
    })
}

type Handler = fn(&mut Mounted, &Event);

fn listen(
    target: &EventTarget,
    kind: &'static str,
    state: &Weak<RefCell<Mounted>>,
    handler: Handler,
) -> Result<EventListener, JsValue> {
    let state = state.clone();
    EventListener::new(target, kind, move |event| {
        with_state(&state, |s| handler(s, &event))
    })
}

fn register_listeners(
    win: &web_sys::Window,
    document: &Document,
    state: Weak<RefCell<Mounted>>,
) -> Result<Vec<EventListener>, JsValue> {
    let mut listeners = Vec::with_capacity(9);
    let win: &EventTarget = win;
    let doc: &EventTarget = document;

    listeners.push(listen(win, "pointermove", &state, |s, e| {
        if let Some(m) = e.dyn_ref::<MouseEvent>() {
            s.sim.pointer_move(PointerSample::new(
                m.client_x() as f32,
                m.client_y() as f32,
                m.movement_x() as f32,
                m.movement_y() as f32,
            ));
        }
    })?);
    listeners.push(listen(win, "pointerdown", &state, |s, _| s.sim.pointer_down())?);
    listeners.push(listen(win, "pointerup", &state, |s, _| s.sim.pointer_up())?);
    listeners.push(listen(doc, "pointerover", &state, |s, e| {
        if dom::targets_interactive(e, &s.hover_selector) {
            s.sim.set_hovering(true);
        }
    })?);
    listeners.push(listen(doc, "pointerout", &state, |s, e| {
        if dom::targets_interactive(e, &s.hover_selector) {
            s.sim.set_hovering(false);
        }
    })?);
    if let Some(root) = document.document_element() {
        let root: &EventTarget = &root;
        listeners.push(listen(root, "pointerenter", &state, |s, _| s.sim.set_visible(true))?);
        listeners.push(listen(root, "pointerleave", &state, |s, _| s.sim.set_visible(false))?);
    }
    listeners.push(listen(win, "resize", &state, |s, _| s.resize())?);
    listeners.push(listen(win, "scroll", &state, |s, _| s.sim.invalidate_anchors())?);

    Ok(listeners)
}
