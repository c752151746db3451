use std::cell::{Ref, RefCell};
use std::future::Future;
use std::rc::Rc;

use pharmacy_api::{ApiClient, ApiError};
use pharmacy_core::FetchState;
use web_sys::console;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::app::{ApiHandle, Notice};

/// Trạng thái một tài nguyên kèm callback tải lại.
pub struct FetchHandle<T> {
    state: Rc<RefCell<FetchState<T>>>,
    pub refetch: Callback<()>,
}

impl<T> Clone for FetchHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            refetch: self.refetch.clone(),
        }
    }
}

impl<T> FetchHandle<T> {
    pub fn state(&self) -> Ref<'_, FetchState<T>> {
        self.state.borrow()
    }
}

/// Tải tài nguyên khi mount và mỗi lần gọi `refetch`.
///
/// Lỗi được báo qua `notify` và giữ nguyên dữ liệu cũ; phản hồi của lần tải cũ
/// về muộn sẽ bị bỏ.
#[hook]
pub fn use_fetch<T, F, Fut>(api: &ApiHandle, notify: &Callback<Notice>, fetch: F) -> FetchHandle<T>
where
    T: 'static,
    F: Fn(ApiClient) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let state = use_mut_ref(FetchState::<T>::default);
    let redraw = use_force_update();

    let refetch = {
        let state = state.clone();
        let api = api.clone();
        let notify = notify.clone();
        Callback::from(move |_: ()| {
            let ticket = state.borrow_mut().begin();
            redraw.force_update();

            let pending = fetch(api.client());
            let state = state.clone();
            let redraw = redraw.clone();
            let notify = notify.clone();
            spawn_local(async move {
                let result = pending.await;
                let failure = result.as_ref().err().map(ToString::to_string);
                if state.borrow_mut().settle(ticket, result) {
                    if let Some(message) = failure {
                        console::error_1(&message.clone().into());
                        notify.emit(Notice::error("Error", message));
                    }
                    redraw.force_update();
                }
            });
        })
    };

    {
        let refetch = refetch.clone();
        use_effect_with((), move |_| {
            refetch.emit(());
            || ()
        });
    }

    FetchHandle { state, refetch }
}
