//! Root yew component.
//!
//! The component holds no state of its own beyond DOM refs. Every callback
//! forwards to the shared [`AppController`] and then forces a re-render from
//! its view model.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use nutrition_track_app::AppController;
use nutrition_track_core::FileSource;
use nutrition_track_ui::{AuthForm, NotificationKind, Reveal, Screen};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    DragEvent, File, HtmlElement, HtmlInputElement, KeyboardEvent, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition,
};
use yew::prelude::*;

use crate::storage::LocalStorage;
use crate::transport::{FetchTransport, read_file};

/// Controller type used by the browser shell.
pub type BrowserController = AppController<LocalStorage, FetchTransport>;

/// Shared handle to the page controller.
#[derive(Clone)]
pub struct ControllerHandle(Rc<RefCell<BrowserController>>);

impl ControllerHandle {
    /// Wraps a controller.
    pub fn new(controller: BrowserController) -> Self {
        Self(Rc::new(RefCell::new(controller)))
    }

    fn borrow(&self) -> Ref<'_, BrowserController> {
        self.0.borrow()
    }

    fn borrow_mut(&self) -> RefMut<'_, BrowserController> {
        self.0.borrow_mut()
    }
}

impl PartialEq for ControllerHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Properties of [`App`].
#[derive(Properties, PartialEq)]
pub struct AppProps {
    /// Page controller.
    pub handle: ControllerHandle,
}

fn local_hour() -> u32 {
    js_sys::Date::new_0().get_hours()
}

fn input_value(node: &NodeRef) -> String {
    node.cast::<HtmlInputElement>()
        .map(|input| input.value())
        .unwrap_or_default()
}

fn enter_pressed(submit: Callback<()>) -> Callback<KeyboardEvent> {
    Callback::from(move |event: KeyboardEvent| {
        if event.key() == "Enter" {
            submit.emit(());
        }
    })
}

/// Reads `file` and hands it to the controller through the pick or drop path.
fn accept_file(handle: ControllerHandle, redraw: UseForceUpdateHandle, file: File, source: FileSource) {
    spawn_local(async move {
        let read = read_file(file, source).await;
        {
            let mut controller = handle.borrow_mut();
            let _ = match (read, source) {
                (Ok(pending), FileSource::DragDrop) => controller.drop_file(Some(pending)),
                (Ok(pending), FileSource::ManualPick) => controller.select_file(pending),
                (Err(reason), _) => Err(controller.file_unreadable(reason)),
            };
        }
        redraw.force_update();
    });
}

/// Page root.
#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let handle = props.handle.clone();
    let redraw = use_force_update();
    let scheduled_dismissals = use_mut_ref(HashSet::<u64>::new);

    let login_email = use_node_ref();
    let login_password = use_node_ref();
    let signup_name = use_node_ref();
    let signup_email = use_node_ref();
    let signup_password = use_node_ref();
    let file_input = use_node_ref();
    let results_ref = use_node_ref();

    let (greeting_reveal, results_reveal, form_generation, notification_ids, reveal_delay_ms, ttl_ms) = {
        let controller = handle.borrow();
        let ui = controller.ui();
        (
            ui.greeting.reveal,
            ui.results.reveal,
            ui.form_generation,
            ui.notifications.iter().map(|n| n.id).collect::<Vec<_>>(),
            controller.config().reveal_delay_ms,
            controller.config().notification_ttl_ms,
        )
    };

    {
        let handle = handle.clone();
        let redraw = redraw.clone();
        use_effect_with((), move |_| {
            handle.borrow_mut().render_for_auth_state(local_hour());
            redraw.force_update();
            || ()
        });
    }

    {
        let handle = handle.clone();
        let redraw = redraw.clone();
        use_effect_with(greeting_reveal, move |reveal| {
            let timeout = (*reveal == Reveal::Pending).then(|| {
                Timeout::new(reveal_delay_ms, move || {
                    handle.borrow_mut().complete_greeting_reveal();
                    redraw.force_update();
                })
            });
            move || drop(timeout)
        });
    }

    {
        let handle = handle.clone();
        let redraw = redraw.clone();
        let results_ref = results_ref.clone();
        use_effect_with(results_reveal, move |reveal| {
            let timeout = (*reveal == Reveal::Pending).then(|| {
                Timeout::new(reveal_delay_ms, move || {
                    handle.borrow_mut().complete_results_reveal();
                    let scroll = handle.borrow_mut().take_scroll_request();
                    if let (true, Some(element)) = (scroll, results_ref.cast::<HtmlElement>()) {
                        let options = ScrollIntoViewOptions::new();
                        options.set_behavior(ScrollBehavior::Smooth);
                        options.set_block(ScrollLogicalPosition::Start);
                        element.scroll_into_view_with_scroll_into_view_options(&options);
                    }
                    redraw.force_update();
                })
            });
            move || drop(timeout)
        });
    }

    {
        let inputs = [
            login_email.clone(),
            login_password.clone(),
            signup_name.clone(),
            signup_email.clone(),
            signup_password.clone(),
        ];
        use_effect_with(form_generation, move |_| {
            for input in inputs.iter().filter_map(NodeRef::cast::<HtmlInputElement>) {
                input.set_value("");
            }
            || ()
        });
    }

    {
        let handle = handle.clone();
        let redraw = redraw.clone();
        let scheduled = scheduled_dismissals.clone();
        use_effect_with(notification_ids, move |ids| {
            let mut scheduled = scheduled.borrow_mut();
            scheduled.retain(|id| ids.contains(id));
            for &id in ids {
                if !scheduled.insert(id) {
                    continue;
                }
                let handle = handle.clone();
                let redraw = redraw.clone();
                spawn_local(async move {
                    TimeoutFuture::new(ttl_ms).await;
                    handle.borrow_mut().dismiss_notification(id);
                    redraw.force_update();
                });
            }
            || ()
        });
    }

    let submit_login = {
        let handle = handle.clone();
        let redraw = redraw.clone();
        let email = login_email.clone();
        let password = login_password.clone();
        Callback::from(move |()| {
            let _ = handle
                .borrow_mut()
                .login(&input_value(&email), &input_value(&password), local_hour());
            redraw.force_update();
        })
    };

    let submit_signup = {
        let handle = handle.clone();
        let redraw = redraw.clone();
        let name = signup_name.clone();
        let email = signup_email.clone();
        let password = signup_password.clone();
        Callback::from(move |()| {
            let _ = handle.borrow_mut().signup(
                &input_value(&name),
                &input_value(&email),
                &input_value(&password),
                local_hour(),
            );
            redraw.force_update();
        })
    };

    let toggle_auth = |show_login: bool| {
        let handle = handle.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            handle.borrow_mut().toggle_auth_mode(show_login);
            redraw.force_update();
        })
    };

    let on_logout = {
        let handle = handle.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            handle.borrow_mut().logout(local_hour());
            redraw.force_update();
        })
    };

    let open_picker = {
        let file_input = file_input.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_file_change = {
        let handle = handle.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: Event| {
            let input = event.target_unchecked_into::<HtmlInputElement>();
            let file = input.files().and_then(|list| list.get(0));
            // Clear so picking the same file again fires another change.
            input.set_value("");
            if let Some(file) = file {
                accept_file(handle.clone(), redraw.clone(), file, FileSource::ManualPick);
            }
        })
    };

    let on_drag_over = {
        let handle = handle.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            if !handle.borrow().ui().upload.drag_active {
                handle.borrow_mut().set_drag_active(true);
                redraw.force_update();
            }
        })
    };

    let on_drag_leave = {
        let handle = handle.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            handle.borrow_mut().set_drag_active(false);
            redraw.force_update();
        })
    };

    let on_drop = {
        let handle = handle.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            let file = event
                .data_transfer()
                .and_then(|transfer| transfer.files())
                .and_then(|list| list.get(0));
            match file {
                Some(file) => accept_file(handle.clone(), redraw.clone(), file, FileSource::DragDrop),
                None => {
                    let _ = handle.borrow_mut().drop_file(None);
                    redraw.force_update();
                }
            }
        })
    };

    let on_reset = {
        let handle = handle.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            handle.borrow_mut().reset();
            redraw.force_update();
        })
    };

    let on_analyze = {
        let handle = handle.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            let started = handle.borrow_mut().begin_analysis();
            redraw.force_update();
            let Ok(request) = started else {
                return;
            };
            let client = handle.borrow().client().clone();
            let handle = handle.clone();
            let redraw = redraw.clone();
            spawn_local(async move {
                let outcome = client.submit(&request).await;
                let _ = handle.borrow_mut().finish_analysis(outcome);
                redraw.force_update();
            });
        })
    };

    let controller = handle.borrow();
    let ui = controller.ui();

    let notifications = html! {
        <div class="notifications">
            { for ui.notifications.iter().map(|notification| {
                let kind = match notification.kind {
                    NotificationKind::Success => "success",
                    NotificationKind::Error => "error",
                    NotificationKind::Info => "info",
                };
                html! {
                    <div key={notification.id} class={classes!("notification", kind)}>
                        { notification.message.clone() }
                    </div>
                }
            }) }
        </div>
    };

    let auth_screen = html! {
        <section class={classes!("auth-screen", (ui.screen != Screen::Auth).then_some("hidden"))}>
            <form
                class={classes!("login-form", (ui.auth_form != AuthForm::Login).then_some("hidden"))}
                onsubmit={Callback::from(|event: SubmitEvent| event.prevent_default())}
            >
                <h2>{ "Welcome Back" }</h2>
                <input type="email" placeholder="Email" ref={login_email} />
                <input
                    type="password"
                    placeholder="Password"
                    ref={login_password}
                    onkeypress={enter_pressed(submit_login.clone())}
                />
                <button type="button" onclick={submit_login.reform(|_: MouseEvent| ())}>{ "Login" }</button>
                <p>
                    { "Don't have an account? " }
                    <a href="#" onclick={toggle_auth(false)}>{ "Sign up" }</a>
                </p>
            </form>
            <form
                class={classes!("signup-form", (ui.auth_form != AuthForm::Signup).then_some("hidden"))}
                onsubmit={Callback::from(|event: SubmitEvent| event.prevent_default())}
            >
                <h2>{ "Create Account" }</h2>
                <input type="text" placeholder="Name" ref={signup_name} />
                <input type="email" placeholder="Email" ref={signup_email} />
                <input
                    type="password"
                    placeholder="Password"
                    ref={signup_password}
                    onkeypress={enter_pressed(submit_signup.clone())}
                />
                <button type="button" onclick={submit_signup.reform(|_: MouseEvent| ())}>{ "Sign Up" }</button>
                <p>
                    { "Already have an account? " }
                    <a href="#" onclick={toggle_auth(true)}>{ "Login" }</a>
                </p>
            </form>
        </section>
    };

    let greeting = match &ui.greeting.greeting {
        Some(greeting) => html! {
            <h1 class={classes!("fade", (ui.greeting.reveal == Reveal::Revealed).then_some("revealed"))}>
                { format!("{}, ", greeting.time_of_day.label()) }
                <span class="user-name">{ greeting.name.clone() }</span>
                { format!(" {}", greeting.time_of_day.emoji()) }
            </h1>
        },
        None => Html::default(),
    };

    let upload = match &ui.upload.preview_src {
        Some(src) => html! {
            <div class="preview-container">
                <img src={src.clone()} alt="Preview" />
                <button type="button" onclick={on_reset}>{ "Change Image" }</button>
            </div>
        },
        None => html! {
            <div
                class={classes!("upload-box", ui.upload.drag_active.then_some("drag-active"))}
                onclick={open_picker}
                ondragover={on_drag_over}
                ondragleave={on_drag_leave}
                ondrop={on_drop}
            >
                <p>{ "Drop a photo of your meal here, or click to choose one" }</p>
            </div>
        },
    };

    let results = match &ui.results.content {
        Some(content) if ui.results.reveal.is_visible() => html! {
            <section
                ref={results_ref}
                class={classes!("results", "fade", (ui.results.reveal == Reveal::Revealed).then_some("revealed"))}
            >
                <h2 class="food-name">{ content.food_name.clone() }</h2>
                <div class="nutrients">
                    <div><span>{ content.calories.clone() }</span>{ " Calories" }</div>
                    <div><span>{ content.protein.clone() }</span>{ " Protein" }</div>
                    <div><span>{ content.carbs.clone() }</span>{ " Carbs" }</div>
                    <div><span>{ content.fats.clone() }</span>{ " Fats" }</div>
                </div>
                <p class="health-tip">{ content.health_tip.clone() }</p>
                <p class="detected-labels">{ content.detected_labels.clone() }</p>
            </section>
        },
        _ => html! { <section ref={results_ref} class="results hidden" /> },
    };

    let main_screen = html! {
        <section class={classes!("main-screen", (ui.screen != Screen::Main).then_some("hidden"))}>
            <header>
                { greeting }
                <button type="button" onclick={on_logout}>{ "Logout" }</button>
            </header>
            <input
                type="file"
                accept="image/*"
                class="hidden"
                ref={file_input}
                onchange={on_file_change}
            />
            { upload }
            <button
                type="button"
                class="analyze-button"
                disabled={!ui.analyze.enabled}
                onclick={on_analyze}
            >
                if ui.analyze.loading {
                    <span class="loader"></span>
                }
                { ui.analyze.label() }
            </button>
            { results }
        </section>
    };

    html! {
        <>
            { notifications }
            { auth_screen }
            { main_screen }
            <footer class="version">{ format!("v{}", ui.version) }</footer>
        </>
    }
}
