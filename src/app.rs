use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, InputEvent, MouseEvent};
use yew::prelude::*;

use crate::auth::{self, AuthUser};
use crate::bridge::{self, Bridge};
use crate::calc::{compute_totals, format_currency};
use crate::model::{ChildEntry, ChildField, ChildKind, FormField, YesNo};
use crate::storage;

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Family,
    Children,
    Transport,
    General,
    Summary,
}

#[derive(Clone, PartialEq)]
struct AccordionState {
    family: bool,
    children: bool,
    transport: bool,
    general: bool,
    summary: bool,
}

impl Default for AccordionState {
    fn default() -> Self {
        Self {
            family: true,
            children: true,
            transport: true,
            general: true,
            summary: true,
        }
    }
}

impl AccordionState {
    fn is_open(&self, section: Section) -> bool {
        match section {
            Section::Family => self.family,
            Section::Children => self.children,
            Section::Transport => self.transport,
            Section::General => self.general,
            Section::Summary => self.summary,
        }
    }

    fn toggled(&self, section: Section) -> Self {
        let mut next = self.clone();
        match section {
            Section::Family => next.family = !next.family,
            Section::Children => next.children = !next.children,
            Section::Transport => next.transport = !next.transport,
            Section::General => next.general = !next.general,
            Section::Summary => next.summary = !next.summary,
        }
        next
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let form = use_state(storage::load_form);
    let accordion = use_state(AccordionState::default);
    let inside_super_qi = use_state(|| false);
    let auth_user = use_state(|| None::<AuthUser>);
    let auth_loading = use_state(|| false);
    let auth_error = use_state(|| None::<String>);

    // The host capability is resolved exactly once; every consumer shares
    // this handle.
    let bridge = use_memo(|_| Bridge::detect(), ());

    // Host detection and the startup auth handshake run exactly once. A
    // bridge without a token is a guest session, not an error.
    {
        let inside_super_qi = inside_super_qi.clone();
        let auth_user = auth_user.clone();
        let auth_error = auth_error.clone();
        let host = bridge.clone();
        use_effect_with_deps(
            move |_| {
                if host.is_host_present() {
                    inside_super_qi.set(true);
                    host.signal_ready();

                    match host.auth_token() {
                        Some(token) => {
                            spawn_local(async move {
                                match auth::exchange_token(&token).await {
                                    Ok(user) => auth_user.set(Some(user)),
                                    Err(err) => {
                                        console::error_1(&JsValue::from_str(&format!(
                                            "Super Qi auth error: {err}"
                                        )));
                                        auth_error.set(Some(err.to_string()));
                                    }
                                }
                            });
                        }
                        None => {
                            console::warn_1(&JsValue::from_str(
                                "Super Qi bridge present but no auth token available",
                            ));
                        }
                    }
                }
                || ()
            },
            (),
        );
    }

    let on_field = {
        let form = form.clone();
        Callback::from(move |field: FormField| {
            let next = form.set_field(field);
            storage::save_form(&next);
            form.set(next);
        })
    };

    let on_child = {
        let form = form.clone();
        Callback::from(move |(index, field): (usize, ChildField)| {
            let next = form.set_child_field(index, field);
            storage::save_form(&next);
            form.set(next);
        })
    };

    let toggle = {
        let accordion = accordion.clone();
        Callback::from(move |section: Section| accordion.set(accordion.toggled(section)))
    };

    let on_login = {
        let auth_user = auth_user.clone();
        let auth_loading = auth_loading.clone();
        let auth_error = auth_error.clone();
        Callback::from(move |_: MouseEvent| {
            auth_loading.set(true);
            auth_error.set(None);

            let user_handle = auth_user.clone();
            let loading_handle = auth_loading.clone();
            let error_handle = auth_error.clone();
            let started = bridge::request_auth_code(Callback::from(
                move |outcome: Result<String, String>| match outcome {
                    Ok(token) => {
                        let user_handle = user_handle.clone();
                        let loading_handle = loading_handle.clone();
                        let error_handle = error_handle.clone();
                        spawn_local(async move {
                            match auth::exchange_token(&token).await {
                                Ok(user) => user_handle.set(Some(user)),
                                Err(err) => error_handle.set(Some(err.to_string())),
                            }
                            loading_handle.set(false);
                        });
                    }
                    Err(message) => {
                        error_handle.set(Some(message));
                        loading_handle.set(false);
                    }
                },
            ));
            if !started {
                auth_loading.set(false);
                auth_error.set(Some("Platform auth not available".to_string()));
            }
        })
    };

    let on_close = {
        let bridge = bridge.clone();
        Callback::from(move |_: MouseEvent| bridge.request_close())
    };

    let totals = compute_totals(&form);

    html! {
        <div class="min-h-screen bg-[#eef2f7] py-6">
            <div class="max-w-xl mx-auto px-4 space-y-4">
                <div class="bg-white rounded-2xl shadow-sm border border-slate-200 p-5 flex justify-between gap-4">
                    <div>
                        <p class="text-[10px] font-bold text-slate-400 uppercase tracking-widest">{"Mini App • Super Qi"}</p>
                        <h1 class="text-xl font-black text-[#173E63] tracking-tight">{"Family Living Calculator"}</h1>
                        <p class="text-xs text-slate-500 mt-1">{"A realistic monthly estimate for the family. Works offline, saved locally."}</p>
                    </div>
                    <div class="flex flex-col items-end gap-2">
                        <div class="bg-[#173E63] text-white px-3 py-1 rounded-full text-[10px] font-bold whitespace-nowrap">
                            { if *inside_super_qi { "Inside Super Qi" } else { "Browser mode" } }
                        </div>
                        {
                            if let Some(user) = &*auth_user {
                                html! { <div class="text-sm font-bold text-[#173E63]">{ format!("Welcome {}", user.display_name()) }</div> }
                            } else {
                                html! {
                                    <button type="button" class="bg-[#f1f4f9] text-[#173E63] px-3 py-1.5 rounded-full text-xs font-bold disabled:opacity-60" onclick={on_login} disabled={*auth_loading}>
                                        { if *auth_loading { "Logging in..." } else { "Log in" } }
                                    </button>
                                }
                            }
                        }
                        {
                            if let Some(message) = &*auth_error {
                                html! { <div class="text-xs text-red-600 text-right">{ message.clone() }</div> }
                            } else {
                                html! {}
                            }
                        }
                    </div>
                </div>

                { section_card(
                    "Basic data",
                    "Family info",
                    accordion.is_open(Section::Family),
                    toggle.reform(|_: MouseEvent| Section::Family),
                    html! {
                        <div class="grid gap-3">
                            <Field
                                label="Monthly salary (IQD)"
                                value={form.salary.clone()}
                                placeholder="e.g. 1200000"
                                prefix="IQD"
                                on_change={on_field.reform(FormField::Salary)}
                            />
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-slate-500">{"Number of wives"}</label>
                                <input type="number" min="0" inputmode="numeric" value={form.wives.clone()}
                                    oninput={{
                                        let on_field = on_field.clone();
                                        Callback::from(move |e: InputEvent| {
                                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                            on_field.emit(FormField::Wives(input.value()));
                                        })
                                    }}
                                    class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-sm text-[#173E63] border-none outline-none" />
                            </div>
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-slate-500">{"Number of children"}</label>
                                <input type="number" min="0" inputmode="numeric" value={form.children_count.clone()}
                                    oninput={{
                                        let on_field = on_field.clone();
                                        Callback::from(move |e: InputEvent| {
                                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                            on_field.emit(FormField::ChildrenCount(input.value()));
                                        })
                                    }}
                                    class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-sm text-[#173E63] border-none outline-none" />
                            </div>
                        </div>
                    },
                ) }

                { section_card(
                    "Children details",
                    "Children expenses",
                    accordion.is_open(Section::Children),
                    toggle.reform(|_: MouseEvent| Section::Children),
                    html! {
                        <div class="grid gap-3">
                            {
                                if form.children.is_empty() {
                                    html! { <div class="text-sm text-slate-400 bg-slate-50 rounded-xl p-3">{"No children yet."}</div> }
                                } else {
                                    html! {}
                                }
                            }
                            { for form.children.iter().enumerate().map(|(index, child)| html! {
                                <ChildCard key={index} index={index} child={child.clone()} on_change={on_child.clone()} />
                            }) }
                        </div>
                    },
                ) }

                { section_card(
                    "Getting around and work",
                    "Transport and taxi work",
                    accordion.is_open(Section::Transport),
                    toggle.reform(|_: MouseEvent| Section::Transport),
                    html! {
                        <div class="grid gap-3">
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-slate-500">{"Do you own a car?"}</label>
                                <YesNoChips value={form.car} on_pick={on_field.reform(FormField::Car)} />
                            </div>
                            {
                                if form.car == YesNo::Yes {
                                    html! {
                                        <>
                                            <div class="space-y-1">
                                                <label class="text-[12px] font-bold text-slate-500">{"Do you drive it as a taxi?"}</label>
                                                <YesNoChips value={form.taxi} on_pick={on_field.reform(FormField::Taxi)} />
                                            </div>
                                            {
                                                if form.taxi == YesNo::Yes {
                                                    html! {
                                                        <Field
                                                            label="Monthly taxi income"
                                                            value={form.taxi_income.clone()}
                                                            on_change={on_field.reform(FormField::TaxiIncome)}
                                                        />
                                                    }
                                                } else {
                                                    html! {}
                                                }
                                            }
                                        </>
                                    }
                                } else {
                                    html! {}
                                }
                            }
                        </div>
                    },
                ) }

                { section_card(
                    "General expenses",
                    "Food and services",
                    accordion.is_open(Section::General),
                    toggle.reform(|_: MouseEvent| Section::General),
                    html! {
                        <div class="grid gap-3">
                            <Field
                                label="Food budget (monthly)"
                                value={form.food.clone()}
                                on_change={on_field.reform(FormField::Food)}
                            />
                            <Field
                                label="Services (power, water, generator, internet)"
                                value={form.services.clone()}
                                on_change={on_field.reform(FormField::Services)}
                            />
                        </div>
                    },
                ) }

                { section_card(
                    "Result",
                    "Income and expense summary",
                    accordion.is_open(Section::Summary),
                    toggle.reform(|_: MouseEvent| Section::Summary),
                    html! {
                        <>
                            <SummaryRow label="Total income" value={totals.total_income} tone="text-[#173E63]" />
                            <SummaryRow label="Total expenses" value={totals.total_expenses} tone="text-[#b91c1c]" />
                            <SummaryRow
                                label={if totals.balance >= 0.0 { "Remaining" } else { "Deficit" }}
                                value={totals.balance.abs()}
                                tone={if totals.balance >= 0.0 { "text-[#0f766e]" } else { "text-[#b91c1c]" }}
                            />
                            <div class="bg-slate-50 rounded-xl p-3 mt-3 text-sm">
                                <div class="font-bold text-[#173E63] mb-2">{"Quick details"}</div>
                                <div class="flex items-center justify-between py-0.5">
                                    <span class="text-slate-500">{"Children expenses"}</span>
                                    <strong>{ format!("{} IQD", format_currency(totals.child_expenses)) }</strong>
                                </div>
                                <div class="flex items-center justify-between py-0.5">
                                    <span class="text-slate-500">{"Services + food"}</span>
                                    <strong>{ format!("{} IQD", format_currency(totals.general)) }</strong>
                                </div>
                                {
                                    if totals.taxi_income > 0.0 {
                                        html! {
                                            <div class="flex items-center justify-between py-0.5">
                                                <span class="text-slate-500">{"Taxi income"}</span>
                                                <strong class="text-[#0f766e]">{ format!("{} IQD", format_currency(totals.taxi_income)) }</strong>
                                            </div>
                                        }
                                    } else {
                                        html! {}
                                    }
                                }
                            </div>
                        </>
                    },
                ) }

                {
                    if *inside_super_qi {
                        html! {
                            <button type="button" class="w-full bg-[#173E63] text-white py-3 rounded-2xl text-sm font-bold shadow-md"
                                onclick={on_close.clone()}>
                                {"Close mini app"}
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        </div>
    }
}

fn section_card(
    mini_label: &'static str,
    title: &'static str,
    open: bool,
    on_toggle: Callback<MouseEvent>,
    body: Html,
) -> Html {
    html! {
        <div class="bg-white rounded-2xl shadow-sm border border-slate-200 p-5">
            <div class="flex items-center justify-between mb-3">
                <div>
                    <p class="text-[10px] font-bold text-slate-400 uppercase tracking-widest">{ mini_label }</p>
                    <h3 class="text-lg font-bold text-[#173E63]">{ title }</h3>
                </div>
                <button type="button" class="bg-[#f1f4f9] text-[#173E63] px-3 py-1 rounded-full text-xs font-bold" onclick={on_toggle}>
                    { if open { "Hide" } else { "Show" } }
                </button>
            </div>
            { if open { body } else { html! {} } }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct FieldProps {
    label: AttrValue,
    value: AttrValue,
    on_change: Callback<String>,
    #[prop_or_default]
    placeholder: AttrValue,
    #[prop_or_default]
    prefix: Option<AttrValue>,
}

// Free-form numeric text on purpose: anything unparseable simply counts as
// zero at calculation time.
#[function_component(Field)]
fn field(props: &FieldProps) -> Html {
    let on_input = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            on_change.emit(input.value());
        })
    };

    html! {
        <div class="space-y-1">
            <label class="text-[12px] font-bold text-slate-500">{ props.label.clone() }</label>
            <div class="flex items-center gap-2 bg-[#f1f4f9] rounded-[10px] px-3">
                {
                    if let Some(prefix) = &props.prefix {
                        html! { <span class="text-[10px] font-bold text-slate-400">{ prefix.clone() }</span> }
                    } else {
                        html! {}
                    }
                }
                <input type="text" inputmode="numeric" pattern="[0-9]*"
                    placeholder={props.placeholder.clone()}
                    value={props.value.clone()}
                    oninput={on_input}
                    class="w-full bg-transparent py-2 text-sm text-[#173E63] border-none outline-none" />
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct YesNoChipsProps {
    value: YesNo,
    on_pick: Callback<YesNo>,
}

#[function_component(YesNoChips)]
fn yes_no_chips(props: &YesNoChipsProps) -> Html {
    html! {
        <div class="flex gap-2">
            { for [(YesNo::Yes, "Yes"), (YesNo::No, "No")].into_iter().map(|(option, label)| {
                let on_pick = props.on_pick.clone();
                let class = if props.value == option {
                    "bg-[#173E63] text-white px-4 py-1.5 rounded-full text-xs font-bold"
                } else {
                    "bg-[#f1f4f9] text-[#173E63] px-4 py-1.5 rounded-full text-xs font-bold"
                };
                html! {
                    <button type="button" class={class} onclick={Callback::from(move |_| on_pick.emit(option))}>
                        { label }
                    </button>
                }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ChildCardProps {
    index: usize,
    child: ChildEntry,
    on_change: Callback<(usize, ChildField)>,
}

#[function_component(ChildCard)]
fn child_card(props: &ChildCardProps) -> Html {
    let index = props.index;

    let child_field = |make: fn(String) -> ChildField| {
        let on_change = props.on_change.clone();
        Callback::from(move |value: String| on_change.emit((index, make(value))))
    };

    let on_age = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            on_change.emit((index, ChildField::Age(input.value())));
        })
    };

    html! {
        <div class="bg-slate-50 rounded-xl p-4 border border-slate-100">
            <div class="flex items-center justify-between gap-2">
                <div class="font-black text-[#173E63]">{ format!("Child #{}", index + 1) }</div>
                <div class="bg-[#f1f4f9] text-[#173E63] px-3 py-1 rounded-full text-[10px] font-bold">
                    { if props.child.kind == ChildKind::Infant { "Infant" } else { "Student" } }
                </div>
            </div>

            <div class="mt-3 space-y-1">
                <label class="text-[12px] font-bold text-slate-500">{"Age (years)"}</label>
                <input type="number" min="0" inputmode="numeric" value={props.child.age.clone()} oninput={on_age}
                    class="w-full bg-white rounded-[10px] px-3 py-2 text-sm text-[#173E63] border border-slate-200 outline-none" />
            </div>

            <div class="mt-3 space-y-1">
                <label class="text-[12px] font-bold text-slate-500">{"Category"}</label>
                <div class="flex gap-2">
                    { for [(ChildKind::Infant, "Infant (under 2)"), (ChildKind::Student, "Child / student")].into_iter().map(|(kind, label)| {
                        let on_change = props.on_change.clone();
                        let class = if props.child.kind == kind {
                            "bg-[#173E63] text-white px-3 py-1.5 rounded-full text-xs font-bold"
                        } else {
                            "bg-[#f1f4f9] text-[#173E63] px-3 py-1.5 rounded-full text-xs font-bold"
                        };
                        html! {
                            <button type="button" class={class} onclick={Callback::from(move |_| on_change.emit((index, ChildField::Kind(kind))))}>
                                { label }
                            </button>
                        }
                    }) }
                </div>
            </div>

            <div class="mt-3 grid gap-3">
                {
                    if props.child.kind == ChildKind::Infant {
                        html! {
                            <>
                                <Field label="Doctor cost (monthly)" value={props.child.doctor.clone()} on_change={child_field(ChildField::Doctor)} />
                                <Field label="Milk cost" value={props.child.milk.clone()} on_change={child_field(ChildField::Milk)} />
                                <Field label="Diapers cost" value={props.child.diapers.clone()} on_change={child_field(ChildField::Diapers)} />
                            </>
                        }
                    } else {
                        html! {
                            <>
                                <Field label="School cost (monthly)" value={props.child.school.clone()} on_change={child_field(ChildField::School)} />
                                <Field label="Transport cost (monthly)" value={props.child.transport.clone()} on_change={child_field(ChildField::Transport)} />
                                <Field label="Daily pocket money (counted monthly)" value={props.child.daily.clone()} on_change={child_field(ChildField::Daily)} />
                                <Field label="Stationery (monthly)" value={props.child.stationery.clone()} on_change={child_field(ChildField::Stationery)} />
                            </>
                        }
                    }
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SummaryRowProps {
    label: AttrValue,
    value: f64,
    tone: &'static str,
}

#[function_component(SummaryRow)]
fn summary_row(props: &SummaryRowProps) -> Html {
    html! {
        <div class="flex items-center justify-between py-2 border-b border-slate-100 last:border-none">
            <div class={classes!("font-bold", "text-sm", props.tone)}>{ props.label.clone() }</div>
            <div class="font-black text-[#173E63]">{ format!("{} IQD", format_currency(props.value)) }</div>
        </div>
    }
}
