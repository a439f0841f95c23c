//! Main window and message pump
//!
//! This module handles:
//! - Registering the window class and creating the main window
//! - Routing WM_KEYDOWN to the controller and WM_PAINT to the renderer
//! - Forwarding worker redraw requests as InvalidateRect calls
//! - Shutting the controller down after the message loop exits
//!
//! The controller lives in a boxed `WindowContext` whose pointer is stored
//! in the window's user data. The box outlives the window; the pointer is
//! cleared on WM_DESTROY.

use std::ffi::c_void;
use std::sync::Arc;

use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BeginPaint, DIB_RGB_COLORS, EndPaint, HDC,
    InvalidateRect, PAINTSTRUCT, SetDIBitsToDevice, UpdateWindow,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, CreateWindowExW, DefWindowProcW, DestroyWindow,
    DispatchMessageW, GWLP_USERDATA, GetClientRect, GetMessageW, GetWindowLongPtrW, IDC_ARROW,
    LoadCursorW, MSG, PostQuitMessage, RegisterClassW, SW_SHOW, SetWindowLongPtrW, ShowWindow,
    TranslateMessage, WM_DESTROY, WM_ERASEBKGND, WM_KEYDOWN, WM_PAINT, WNDCLASSW,
    WS_OVERLAPPEDWINDOW,
};
use windows::core::{PCWSTR, w};

use crate::app::controller::{AnimationController, AppError};
use crate::config::{SceneConfig, WindowConfig};
use crate::ui::renderer::PixmapSurface;
use crate::ui::surface::RedrawRequest;

const KEY_PREVIOUSLY_DOWN: isize = 1 << 30;

/// Error types for window operations
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Failed to get module handle")]
    ModuleHandleFailed,

    #[error("Failed to register main window class")]
    WindowClassRegistrationFailed,

    #[error("Failed to create main window")]
    WindowCreationFailed,

    #[error("Failed to query client area of window {0:?}")]
    ClientRectFailed(HWND),
}

/// Turns worker redraw requests into InvalidateRect calls
///
/// InvalidateRect may be called from any thread; the actual repaint happens
/// on the UI thread when it next processes WM_PAINT.
#[derive(Debug, Clone, Copy)]
pub struct WindowRedraw {
    hwnd: HWND,
}

impl WindowRedraw {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }
}

impl RedrawRequest for WindowRedraw {
    fn request_redraw(&self) {
        // Fails harmlessly once the window is gone
        let _ = unsafe { InvalidateRect(self.hwnd, None, false) };
    }
}

/// State reachable from the window procedure
struct WindowContext {
    controller: AnimationController,
    surface: Option<PixmapSurface>,
}

impl WindowContext {
    fn paint(&mut self, hwnd: HWND, hdc: HDC) -> Result<(), AppError> {
        let mut client = RECT::default();
        if unsafe { GetClientRect(hwnd, &mut client) }.is_err() {
            return Err(WindowError::ClientRectFailed(hwnd).into());
        }

        let width = (client.right - client.left).max(1) as u32;
        let height = (client.bottom - client.top).max(1) as u32;

        let mut surface = match self.surface.take() {
            Some(mut surface) => {
                surface.resize(width, height)?;
                surface
            }
            None => PixmapSurface::new(width, height)?,
        };

        self.controller.render(&mut surface);
        let pixels = surface.to_bgra();

        let bitmap_info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width as i32,
                biHeight: -(height as i32), // top-down rows, same order as the pixmap
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        unsafe {
            SetDIBitsToDevice(
                hdc,
                0,
                0,
                width,
                height,
                0,
                0,
                0,
                height,
                pixels.as_ptr() as *const c_void,
                &bitmap_info,
                DIB_RGB_COLORS,
            );
        }

        self.surface = Some(surface);
        Ok(())
    }
}

unsafe fn context_mut(hwnd: HWND) -> Option<&'static mut WindowContext> {
    unsafe {
        let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowContext;
        ptr.as_mut()
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            unsafe {
                let mut ps = PAINTSTRUCT::default();
                let hdc = BeginPaint(hwnd, &mut ps);

                if let Some(context) = context_mut(hwnd) {
                    if let Err(err) = context.paint(hwnd, hdc) {
                        log::error!("Repaint failed: {err}");
                    }
                }

                let _ = EndPaint(hwnd, &ps);
            }
            LRESULT(0)
        }
        // The whole client area is covered by the blit
        WM_ERASEBKGND => LRESULT(1),
        WM_KEYDOWN => {
            // Bit 30 is set for auto-repeat; holding a key toggles only once
            let repeated = lparam.0 & KEY_PREVIOUSLY_DOWN != 0;
            if repeated {
                return LRESULT(0);
            }
            if let Some(context) = unsafe { context_mut(hwnd) } {
                context.controller.handle_key(wparam.0 as u32);
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            unsafe {
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
                PostQuitMessage(0);
            }
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/// Registers the window class and creates the (hidden) main window
fn create_main_window(config: &WindowConfig) -> Result<HWND, WindowError> {
    let class_name = w!("SpinningCirclesWindow");

    let hinstance =
        unsafe { GetModuleHandleW(None) }.map_err(|_| WindowError::ModuleHandleFailed)?;

    let wc = WNDCLASSW {
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(window_proc),
        hInstance: hinstance.into(),
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
        lpszClassName: class_name,
        ..Default::default()
    };

    let class_atom = unsafe { RegisterClassW(&wc) };
    if class_atom == 0 {
        return Err(WindowError::WindowClassRegistrationFailed);
    }

    let title: Vec<u16> = format!("{}\0", config.title).encode_utf16().collect();

    let hwnd = unsafe {
        CreateWindowExW(
            Default::default(),
            class_name,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            config.width,
            config.height,
            None, // No parent
            None, // No menu
            hinstance,
            None,
        )
    };

    if hwnd.0 == 0 {
        return Err(WindowError::WindowCreationFailed);
    }

    Ok(hwnd)
}

/// Why the message loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopExit {
    /// WM_QUIT was received; the window is already destroyed
    Quit,
    /// GetMessageW failed; the window may still exist
    Failed,
}

/// Maps a GetMessageW return value to a loop exit, `None` to keep dispatching
fn loop_exit(result: i32) -> Option<LoopExit> {
    match result {
        0 => Some(LoopExit::Quit),
        -1 => Some(LoopExit::Failed),
        _ => None,
    }
}

fn pump_messages() -> LoopExit {
    let mut msg = MSG::default();

    loop {
        let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };

        if let Some(exit) = loop_exit(result.0) {
            if exit == LoopExit::Failed {
                log::error!("GetMessageW failed, leaving message loop");
            }
            return exit;
        }

        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Opens the window, animates until it is closed, then joins every worker
pub fn run(config: SceneConfig) -> Result<(), AppError> {
    config.validate()?;

    let hwnd = create_main_window(&config.window)?;
    log::info!("Created main window {:?}", hwnd);

    let redraw: Arc<dyn RedrawRequest> = Arc::new(WindowRedraw::new(hwnd));
    let controller = match AnimationController::start(config, redraw) {
        Ok(controller) => controller,
        Err(err) => {
            unsafe {
                DestroyWindow(hwnd).ok();
            }
            return Err(err);
        }
    };

    let mut context = Box::new(WindowContext {
        controller,
        surface: None,
    });

    unsafe {
        SetWindowLongPtrW(
            hwnd,
            GWLP_USERDATA,
            &mut *context as *mut WindowContext as isize,
        );
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
    }

    if pump_messages() == LoopExit::Failed {
        // The context is dropped below; the window must not reach it afterwards
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            DestroyWindow(hwnd).ok();
        }
    }
    log::info!("Message loop finished");

    context.controller.shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_error_messages() {
        assert_eq!(
            WindowError::WindowCreationFailed.to_string(),
            "Failed to create main window"
        );
    }

    #[test]
    fn message_loop_exit_codes() {
        assert_eq!(loop_exit(0), Some(LoopExit::Quit));
        assert_eq!(loop_exit(-1), Some(LoopExit::Failed));
        assert_eq!(loop_exit(1), None);
    }
}
