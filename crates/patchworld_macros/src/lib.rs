use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, Pat};

/// Time a neighbor query or simulation system when the `perf_stats` feature is enabled.
///
/// The function body is wrapped with a drop guard that reports the elapsed time
/// through `bevy::log`. With `perf_stats` disabled the guard is not emitted at all.
///
/// - Queries report at `debug` level once they exceed the threshold
///   (microseconds, default 200).
/// - Systems that take `tick: Res<SimTick>` additionally report every 100 ticks
///   at `info` level, regardless of the threshold.
///
/// # Example
/// ```ignore
/// #[profile]
/// pub fn in_radius(&self, origin: AgentRef, source: &SourceSet, radius: f64, wrap: bool)
///     -> Result<Vec<AgentRef>, WorldError> { ... }
///
/// #[profile(1000)]
/// pub fn survey_neighbors(world: Res<PatchWorld>, tick: Res<SimTick>) { ... }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_us: u128 = if attr.is_empty() {
        200
    } else {
        attr.to_string().trim().parse().unwrap_or(200)
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    let has_tick_param = sig.inputs.iter().any(|arg| {
        let FnArg::Typed(pat_type) = arg else {
            return false;
        };
        let Pat::Ident(pat_ident) = &*pat_type.pat else {
            return false;
        };
        let ty = &pat_type.ty;
        pat_ident.ident == "tick" && quote!(#ty).to_string().contains("SimTick")
    });

    let tick_field = if has_tick_param {
        quote! { Some(tick.0) }
    } else {
        quote! { None }
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = {
                struct ProfileGuard {
                    name: &'static str,
                    start: std::time::Instant,
                    tick: Option<u64>,
                }
                impl Drop for ProfileGuard {
                    fn drop(&mut self) {
                        let elapsed = self.start.elapsed();
                        match self.tick {
                            Some(tick) if tick % 100 == 0 => {
                                bevy::log::info!("[PERF] {} @ tick {}: {:?}", self.name, tick, elapsed);
                            }
                            _ if elapsed.as_micros() > #threshold_us => {
                                bevy::log::debug!("[PERF] {}: {:?}", self.name, elapsed);
                            }
                            _ => {}
                        }
                    }
                }
                ProfileGuard {
                    name: #fn_name_str,
                    start: std::time::Instant::now(),
                    tick: #tick_field,
                }
            };

            #block
        }
    };

    output.into()
}
