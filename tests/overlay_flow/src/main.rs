fn main() {
    println!("Run `cargo test -p overlay-flow` to execute overlay flow tests.");
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use overlog_banner::{Banner, BannerStyle};
    use overlog_format::Value;
    use overlog_intercept::{
        ConsoleSinks, FetchError, FetchFn, FetchRequest, FetchResponse, HostBindings, install,
    };
    use overlog_lifecycle::{
        BannerHub, Options, OptionsPatch, RenderError, RenderSurface,
    };

    /// Surface double recording every lifecycle notification.
    #[derive(Default)]
    struct RecordingSurface {
        created: Mutex<Vec<u64>>,
        removed: Mutex<Vec<u64>>,
        rebuilt: Mutex<Vec<Options>>,
        fail_all: AtomicBool,
    }

    impl RenderSurface for RecordingSurface {
        fn banner_created(&self, banner: &Banner) -> Result<(), RenderError> {
            if self.fail_all.load(Ordering::Relaxed) {
                return Err(RenderError::Detached);
            }
            self.created.lock().unwrap().push(banner.id());
            Ok(())
        }

        fn banner_removed(&self, banner: &Banner) -> Result<(), RenderError> {
            if self.fail_all.load(Ordering::Relaxed) {
                return Err(RenderError::Detached);
            }
            self.removed.lock().unwrap().push(banner.id());
            Ok(())
        }

        fn rebuild(&self, options: &Options) -> Result<(), RenderError> {
            self.rebuilt.lock().unwrap().push(options.clone());
            Ok(())
        }

        fn viewport_width(&self) -> u32 {
            390
        }
    }

    fn hub_with(options: Options) -> (Arc<BannerHub>, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let hub = Arc::new(BannerHub::new(options, Arc::clone(&surface) as Arc<dyn RenderSurface>));
        (hub, surface)
    }

    fn sink_into(seen: Rc<RefCell<Vec<String>>>) -> Box<dyn Fn(&[Value])> {
        Box::new(move |args| {
            seen.borrow_mut().push(format!("{} args", args.len()));
        })
    }

    fn fetch_returning(result: Result<FetchResponse, FetchError>) -> FetchFn {
        Box::new(move |_req| {
            let result = result.clone();
            Box::pin(async move { result })
        })
    }

    #[tokio::test]
    async fn installed_console_feeds_original_and_surface() {
        let (hub, surface) = hub_with(Options::default());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let intercepts = install(
            Arc::clone(&hub),
            HostBindings {
                console: ConsoleSinks {
                    log: Some(sink_into(Rc::clone(&seen))),
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        intercepts.console.log(&[
            Value::text("boot"),
            Value::record(vec![("ok".into(), Value::Bool(true))]),
        ]);

        assert_eq!(seen.borrow().as_slice(), &["2 args".to_string()]);
        assert_eq!(surface.created.lock().unwrap().len(), 1);

        let active = hub.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text(), vec!["boot {ok: true}"]);
        assert_eq!(active[0].shadow().len(), 2);
    }

    #[tokio::test]
    async fn display_failures_never_reach_the_logging_caller() {
        let (hub, surface) = hub_with(Options::default());
        surface.fail_all.store(true, Ordering::Relaxed);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let intercepts = install(
            Arc::clone(&hub),
            HostBindings {
                console: ConsoleSinks {
                    warn: Some(sink_into(Rc::clone(&seen))),
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        // The surface rejects everything; the host-visible call is unaffected.
        intercepts.console.warn(&[Value::text("still fine")]);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(hub.len(), 1);
    }

    #[tokio::test]
    async fn host_console_fault_propagates_through_the_wrapper() {
        let (hub, _surface) = hub_with(Options::default());

        let intercepts = install(
            Arc::clone(&hub),
            HostBindings {
                console: ConsoleSinks {
                    error: Some(Box::new(|_| panic!("host sink exploded"))),
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            intercepts.console.error(&[Value::text("unseen")]);
        }));

        assert!(outcome.is_err());
        assert!(hub.is_empty());
    }

    #[tokio::test]
    async fn admission_bound_holds_across_intercept_kinds() {
        let (hub, surface) = hub_with(Options {
            max_message: 2,
            ..Default::default()
        });

        let intercepts = install(
            Arc::clone(&hub),
            HostBindings {
                console: ConsoleSinks {
                    log: Some(Box::new(|_| {})),
                    ..Default::default()
                },
                fetch: Some(fetch_returning(Ok(FetchResponse {
                    status: 200,
                    status_text: "OK".into(),
                    body_preview: None,
                }))),
                page_host: Some("app.local".into()),
                ..Default::default()
            },
        );

        intercepts.console.log(&[Value::text("one")]);
        intercepts.console.log(&[Value::text("two")]);
        intercepts
            .fetch
            .as_ref()
            .unwrap()
            .call(FetchRequest {
                method: "GET".into(),
                url: "https://app.local/three".into(),
            })
            .await
            .unwrap();

        assert_eq!(hub.len(), 2);
        let texts: Vec<String> = hub.active().iter().map(|b| b.text().join(" ")).collect();
        assert!(texts[0].starts_with("GET /three"));
        assert_eq!(texts[1], "two");
        // "one" was displaced and its visual detached.
        assert_eq!(surface.removed.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_banner_settles_then_expires_on_the_sweep() {
        let (hub, surface) = hub_with(Options {
            autohide_delay_ms: 10_000,
            ..Default::default()
        });
        hub.start();

        let failing: FetchFn = Box::new(|_req| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(250)).await;
                Ok(FetchResponse {
                    status: 500,
                    status_text: "Internal Server Error".into(),
                    body_preview: Some("stack overflowed".into()),
                })
            })
        });

        let intercepts = install(
            Arc::clone(&hub),
            HostBindings {
                fetch: Some(failing),
                page_host: Some("app.local".into()),
                ..Default::default()
            },
        );

        let response = intercepts
            .fetch
            .as_ref()
            .unwrap()
            .call(FetchRequest {
                method: "POST".into(),
                url: "https://app.local/api/save".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.status, 500);

        let banner = hub.active()[0].clone();
        assert_eq!(banner.style(), BannerStyle::NetworkError);
        let text = banner.text().join(" ");
        assert!(text.starts_with("POST /api/save"));
        assert!(text.contains("[500 Internal Server Error]"));
        assert!(text.contains("[250ms]"));
        assert!(text.contains("stack overflowed"));

        // The settled banner ages out like any other.
        tokio::time::sleep(Duration::from_millis(11_500)).await;
        assert!(hub.is_empty());
        assert_eq!(*surface.removed.lock().unwrap(), vec![banner.id()]);

        hub.stop();
    }

    #[tokio::test]
    async fn options_patch_from_json_reconfigures_without_clearing() {
        let (hub, surface) = hub_with(Options::default());

        let intercepts = install(
            Arc::clone(&hub),
            HostBindings {
                console: ConsoleSinks {
                    info: Some(Box::new(|_| {})),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        intercepts.console.info(&[Value::text("kept across reconfig")]);

        let patch: OptionsPatch =
            serde_json::from_str(r#"{"position": "top-right", "opacity": 0.9, "maxWidth": 4}"#)
                .unwrap();
        hub.set_options(&patch);

        let options = hub.options();
        assert_eq!(options.opacity, 0.9);
        // A tiny max width resolves as auto against the surface viewport.
        assert_eq!(
            options.effective_max_width(surface.viewport_width()),
            390 - 2 * options.offset_x
        );

        assert_eq!(surface.rebuilt.lock().unwrap().len(), 1);
        assert_eq!(hub.len(), 1, "reconfiguration keeps active banners");
    }
}
