//! ルートテーブル
//!
//! 起動時に一度だけ構築され、その後は変更されない。
//! 完全一致のルートが常にワイルドカードより優先され、
//! ワイルドカード同士では最長のプレフィックスが選ばれる。

use super::dispatcher::RouteHandler;
use axum::http::Method;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// パスの完全一致
    Exact(String),
    /// `/assets/*` のような末尾ワイルドカード
    Prefix(String),
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix('*') {
            Some(prefix) => RoutePattern::Prefix(prefix.to_string()),
            None => RoutePattern::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Exact(exact) => exact == path,
            RoutePattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

pub struct Route {
    pattern: RoutePattern,
    /// None の場合はハンドラ自身がメソッドを判定する
    method: Option<Method>,
    handler: Arc<dyn RouteHandler>,
}

impl Route {
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn handler(&self) -> &dyn RouteHandler {
        self.handler.as_ref()
    }

    fn accepts(&self, method: &Method) -> bool {
        self.method.as_ref().is_none_or(|m| m == method)
    }
}

pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn lookup(&self, method: &Method, path: &str) -> Option<&Route> {
        let exact = self.routes.iter().find(|route| {
            matches!(&route.pattern, RoutePattern::Exact(p) if p == path) && route.accepts(method)
        });
        if exact.is_some() {
            return exact;
        }

        let mut best: Option<(&Route, usize)> = None;
        for route in &self.routes {
            let RoutePattern::Prefix(prefix) = &route.pattern else {
                continue;
            };
            if !route.pattern.matches(path) || !route.accepts(method) {
                continue;
            }
            if best.is_none_or(|(_, len)| prefix.len() > len) {
                best = Some((route, prefix.len()));
            }
        }
        best.map(|(route, _)| route)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
}

impl RouteTableBuilder {
    /// 任意のメソッドを受け付けるルート
    pub fn route(self, pattern: &str, handler: Arc<dyn RouteHandler>) -> Self {
        self.add(pattern, None, handler)
    }

    /// 指定したメソッドだけを受け付けるルート
    pub fn route_method(
        self,
        method: Method,
        pattern: &str,
        handler: Arc<dyn RouteHandler>,
    ) -> Self {
        self.add(pattern, Some(method), handler)
    }

    fn add(mut self, pattern: &str, method: Option<Method>, handler: Arc<dyn RouteHandler>) -> Self {
        self.routes.push(Route {
            pattern: RoutePattern::parse(pattern),
            method,
            handler,
        });
        self
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
        }
    }
}
