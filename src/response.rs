use http::{HeaderMap, StatusCode};

/// A successful response: status, headers and the decoded body.
#[derive(Clone, Debug)]
pub struct DetailedResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub result: T,
}

impl<T> DetailedResponse<T> {
    pub fn into_result(self) -> T {
        self.result
    }

    pub fn map<U, F>(self, f: F) -> DetailedResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        DetailedResponse {
            status: self.status,
            headers: self.headers,
            result: f(self.result),
        }
    }
}
