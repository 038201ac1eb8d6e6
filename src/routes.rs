use crate::{
    api::{attendance, employee, mapping, punch, shift},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                // punch ingest gets its own, looser limiter: the badge
                // devices replay in bursts after a network drop
                web::resource("/punches")
                    .wrap(build_limiter(config.rate_punch_per_min))
                    .route(web::post().to(punch::create_punch))
                    .route(web::get().to(punch::list_punches)),
            )
            .service(
                web::scope("/attendance")
                    .wrap(build_limiter(config.rate_api_per_min))
                    // /attendance/shift
                    .service(
                        web::resource("/shift")
                            .route(web::get().to(attendance::shift_attendance)),
                    )
                    // /attendance/current
                    .service(
                        web::resource("/current")
                            .route(web::get().to(attendance::current_instances)),
                    )
                    // /attendance/recent
                    .service(
                        web::resource("/recent")
                            .route(web::get().to(attendance::recent_instances)),
                    ),
            )
            .service(
                web::scope("/shifts")
                    .wrap(build_limiter(config.rate_api_per_min))
                    // /shifts
                    .service(
                        web::resource("")
                            .route(web::post().to(shift::create_shift))
                            .route(web::get().to(shift::list_shifts)),
                    )
                    // /shifts/{shift_code}
                    .service(
                        web::resource("/{shift_code}")
                            .route(web::get().to(shift::get_shift))
                            .route(web::put().to(shift::update_shift))
                            .route(web::delete().to(shift::delete_shift)),
                    ),
            )
            .service(
                web::scope("/shift-mappings")
                    .wrap(build_limiter(config.rate_api_per_min))
                    .service(
                        web::resource("")
                            .route(web::get().to(mapping::list_mappings))
                            .route(web::put().to(mapping::upsert_mapping)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .wrap(build_limiter(config.rate_api_per_min))
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{emp_code}
                    .service(
                        web::resource("/{emp_code}")
                            .route(web::get().to(employee::get_employee)),
                    ),
            ),
    );
}
