//! Transient notifications. Every surfaced error ends up here.

use std::time::Duration;

use dioxus::prelude::*;

const TOAST_CSS: Asset = asset!("/assets/toast.css");

/// How long a toast stays up before dismissing itself.
const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

/// Handle for raising toasts, shared through context by [`ToastProvider`].
#[derive(Clone, Copy, PartialEq)]
pub struct Toaster {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

pub fn use_toaster() -> Toaster {
    use_context::<Toaster>()
}

impl Toaster {
    pub fn info(self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message.into());
    }

    pub fn success(self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message.into());
    }

    pub fn error(self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message.into());
    }

    pub fn dismiss(self, id: u64) {
        let mut toasts = self.toasts;
        toasts.write().retain(|t| t.id != id);
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.read().clone()
    }

    /// Queue a toast. Its dismiss timer is owned by the stack that renders it,
    /// so it still fires after the component that raised it has unmounted.
    fn push(self, level: ToastLevel, message: String) {
        let mut next_id = self.next_id;
        let mut toasts = self.toasts;
        let id = *next_id.peek();
        next_id.set(id + 1);
        toasts.write().push(Toast { id, level, message });
    }
}

async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Provides a [`Toaster`] to its subtree and renders the toast stack.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    let toasts = use_signal(Vec::new);
    let next_id = use_signal(|| 0u64);
    use_context_provider(|| Toaster { toasts, next_id });

    rsx! {
        {children}
        ToastStack {}
    }
}

#[component]
fn ToastStack() -> Element {
    let toaster = use_toaster();

    rsx! {
        document::Stylesheet { href: TOAST_CSS }
        div {
            class: "toast-stack",
            for toast in toaster.toasts() {
                ToastItem { key: "{toast.id}", toast }
            }
        }
    }
}

#[component]
fn ToastItem(toast: Toast) -> Element {
    let toaster = use_toaster();
    let id = toast.id;

    use_future(move || async move {
        sleep(TOAST_TTL).await;
        toaster.dismiss(id);
    });

    rsx! {
        div {
            class: match toast.level {
                ToastLevel::Error => "toast error",
                ToastLevel::Success => "toast success",
                ToastLevel::Info => "toast info",
            },
            span { "{toast.message}" }
            button {
                class: "toast-close",
                onclick: move |_| toaster.dismiss(id),
                "×"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    thread_local! {
        static VISIBLE: Cell<usize> = const { Cell::new(0) };
    }

    #[component]
    fn VisibleCount() -> Element {
        let toaster = use_toaster();
        VISIBLE.with(|v| v.set(toaster.toasts().len()));
        rsx! {}
    }

    /// Raises a toast and then asks its parent to unmount it, like an editor
    /// navigating away after a save.
    #[component]
    fn SaveAndLeave(on_saved: EventHandler<()>) -> Element {
        let toaster = use_toaster();
        use_future(move || async move {
            toaster.success("Saved");
            on_saved.call(());
        });
        rsx! {}
    }

    fn app() -> Element {
        let mut editing = use_signal(|| true);
        rsx! {
            ToastProvider {
                if editing() {
                    SaveAndLeave { on_saved: move |_| editing.set(false) }
                }
                VisibleCount {}
            }
        }
    }

    async fn settle(dom: &mut VirtualDom) {
        while tokio::time::timeout(Duration::from_millis(10), dom.wait_for_work())
            .await
            .is_ok()
        {
            dom.render_immediate_to_vec();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_outlives_the_component_that_raised_it() {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        settle(&mut dom).await;
        assert_eq!(VISIBLE.with(Cell::get), 1);

        tokio::time::sleep(TOAST_TTL).await;
        settle(&mut dom).await;
        assert_eq!(VISIBLE.with(Cell::get), 0);
    }
}
