#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn fresh_canvas() -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

async fn next_animation_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
}

fn dispatch_pointer_move(x: f64, y: f64, dx: i32) {
    let init = web_sys::MouseEventInit::new();
    init.set_client_x(x as i32);
    init.set_client_y(y as i32);
    init.set_movement_x(dx);
    let event = web_sys::MouseEvent::new_with_mouse_event_init_dict("pointermove", &init).unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn mount_and_unmount_restore_the_page() {
    let canvas = fresh_canvas();
    let mut handle = match trail_wasm::wasm::mount(canvas, None) {
        Ok(handle) => handle,
        // Headless runners without a GPU cannot create a WebGL2 context.
        Err(err) if format!("{err:?}").contains("WebGL2") => return,
        Err(err) => panic!("mount failed: {err:?}"),
    };
    assert!(handle.mounted());

    let body = web_sys::window().unwrap().document().unwrap().body().unwrap();
    assert!(body.class_list().contains("custom-cursor-active"));

    handle.unmount();
    assert!(!handle.mounted());
    assert!(!body.class_list().contains("custom-cursor-active"));

    // Teardown runs once; repeated calls are no-ops.
    handle.unmount();
    assert_eq!(handle.particle_count(), 0);
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    let canvas = fresh_canvas();
    let result = trail_wasm::wasm::mount(canvas, Some(r#"{ "pool": { "capacity": 0 } }"#.into()));
    assert!(result.is_err());
}

#[wasm_bindgen_test]
async fn callbacks_after_unmount_are_ignored() {
    let canvas = fresh_canvas();
    let mut handle = match trail_wasm::wasm::mount(canvas, None) {
        Ok(handle) => handle,
        Err(err) if format!("{err:?}").contains("WebGL2") => return,
        Err(err) => panic!("mount failed: {err:?}"),
    };

    dispatch_pointer_move(100.0, 100.0, 40);
    assert!(handle.particle_count() > 0);
    next_animation_frame().await;

    handle.unmount();
    next_animation_frame().await;
    dispatch_pointer_move(120.0, 100.0, 40);
    next_animation_frame().await;

    assert!(!handle.mounted());
    assert_eq!(handle.particle_count(), 0);
}
