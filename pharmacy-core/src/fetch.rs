//! Bộ ba dữ liệu/đang tải/lỗi dùng chung cho mọi tài nguyên tải từ API.

use std::fmt::Display;

/// Vé của một lần tải; chỉ vé mới nhất được phép ghi kết quả.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    issued: u64,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            issued: 0,
        }
    }
}

impl<T> FetchState<T> {
    /// Bắt đầu một lần tải mới. Dữ liệu cũ vẫn giữ nguyên để hiển thị.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        self.loading = true;
        self.error = None;
        RequestTicket(self.issued)
    }

    /// Ghi kết quả của một lần tải. Trả về `false` khi vé đã cũ và kết quả bị bỏ.
    ///
    /// Lỗi không xoá dữ liệu trước đó.
    pub fn settle<E: Display>(&mut self, ticket: RequestTicket, result: Result<T, E>) -> bool {
        if ticket.0 != self.issued {
            return false;
        }

        self.loading = false;
        match result {
            Ok(value) => {
                self.data = Some(value);
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        true
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl<T> FetchState<Vec<T>> {
    /// Danh sách đã tải, hoặc slice rỗng khi chưa có dữ liệu.
    pub fn items(&self) -> &[T] {
        self.data.as_deref().unwrap_or_default()
    }
}
