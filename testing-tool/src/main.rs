use anyhow::{anyhow, Result};
use colored::*;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚗 Fleet Mileage Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    // Paso 1: servidor y usuario que actúa
    let session = get_session()?;
    let client = Client::new();

    check_health(&client, &session).await?;

    // Paso 2: Menú principal
    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🚗 Crear vehículo");
        println!("2. 🛣️ Registrar viaje");
        println!("3. 📜 Ver viajes de un vehículo");
        println!("4. 📊 Informe de kilometraje");
        println!("5. 👥 Grupo de propietarios");
        println!("6. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-6): ")?;

        let outcome = match choice.as_str() {
            "1" => create_vehicle(&client, &session).await,
            "2" => register_trip(&client, &session).await,
            "3" => list_trips(&client, &session).await,
            "4" => mileage_report(&client, &session).await,
            "5" => owner_group(&client, &session).await,
            "6" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("{}", format!("❌ {}", e).bright_red());
        }
    }

    Ok(())
}

#[derive(Debug)]
struct Session {
    base_url: String,
    user_id: String,
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

fn get_session() -> Result<Session> {
    println!("{}", "🔐 CONFIGURACIÓN".bright_cyan().bold());
    println!("{}", "================".bright_cyan());

    let mut base_url = prompt("URL del servidor (http://localhost:3000): ")?;
    if base_url.is_empty() {
        base_url = "http://localhost:3000".to_string();
    }
    let user_id = prompt("Tu user id (UUID, cabecera x-user-id): ")?;
    if user_id.is_empty() {
        return Err(anyhow!("Se requiere un user id"));
    }

    Ok(Session {
        base_url: base_url.trim_end_matches('/').to_string(),
        user_id,
    })
}

async fn check_health(client: &Client, session: &Session) -> Result<()> {
    let response = client.get(format!("{}/health", session.base_url)).send().await?;
    print_response(response).await?;
    Ok(())
}

async fn create_vehicle(client: &Client, session: &Session) -> Result<()> {
    let registration = prompt("Matrícula: ")?;
    let vehicle_type = prompt("Tipo (lte9, gt9, mb, sct): ")?;
    let owners = prompt("Propietarios (UUIDs separados por coma, opcional): ")?;
    let owner_ids: Vec<&str> = owners
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let payload = json!({
        "registration_number": registration,
        "vehicle_type": vehicle_type,
        "owner_ids": owner_ids,
    });
    print_payload(&payload)?;

    let response = client
        .post(format!("{}/api/vehicles", session.base_url))
        .json(&payload)
        .send()
        .await?;
    print_response(response).await?;
    Ok(())
}

async fn register_trip(client: &Client, session: &Session) -> Result<()> {
    let vehicle_id = prompt("Vehicle id: ")?;
    let departure = prompt("Fecha de salida (YYYY-MM-DD): ")?;
    let mut return_date = prompt("Fecha de regreso (vacío = misma fecha): ")?;
    if return_date.is_empty() {
        return_date = departure.clone();
    }
    let reason = prompt("Motivo: ")?;
    let start = prompt("Origen: ")?;
    let end = prompt("Destino: ")?;
    let odometer: i64 = prompt("Odómetro al llegar (km): ")?
        .parse()
        .map_err(|_| anyhow!("El odómetro debe ser un número entero"))?;

    let payload = json!({
        "vehicle_id": vehicle_id,
        "departure_date": departure,
        "return_date": return_date,
        "trip_reason": reason,
        "start_location": start,
        "end_location": end,
        "odometer_at_end": odometer,
    });
    print_payload(&payload)?;

    let response = client
        .post(format!("{}/api/trips", session.base_url))
        .header("x-user-id", &session.user_id)
        .json(&payload)
        .send()
        .await?;
    print_response(response).await?;
    Ok(())
}

async fn list_trips(client: &Client, session: &Session) -> Result<()> {
    let vehicle_id = prompt("Vehicle id: ")?;
    let response = client
        .get(format!("{}/api/vehicles/{}/trips", session.base_url, vehicle_id))
        .send()
        .await?;
    let body = print_response(response).await?;

    if let Some(trips) = body.as_array() {
        println!(
            "{}",
            format!("🛣️ VIAJES ENCONTRADOS: {}", trips.len())
                .bright_green()
                .bold()
        );
        for trip in trips {
            println!(
                "   {} → {}  {} km (odómetro {})",
                trip["departure_date"].as_str().unwrap_or("?"),
                trip["return_date"].as_str().unwrap_or("?"),
                trip["traveled_distance"],
                trip["odometer_at_end"],
            );
        }
    }
    Ok(())
}

async fn mileage_report(client: &Client, session: &Session) -> Result<()> {
    let vehicle_id = prompt("Vehicle id: ")?;
    let mut driver_id = prompt("Driver id (vacío = tu user id): ")?;
    if driver_id.is_empty() {
        driver_id = session.user_id.clone();
    }
    let start = prompt("Desde (YYYY-MM-DD): ")?;
    let end = prompt("Hasta (YYYY-MM-DD): ")?;

    let response = client
        .get(format!("{}/api/reports/mileage", session.base_url))
        .query(&[
            ("vehicle_id", vehicle_id.as_str()),
            ("driver_id", driver_id.as_str()),
            ("start_date", start.as_str()),
            ("end_date", end.as_str()),
        ])
        .send()
        .await?;
    let body = print_response(response).await?;

    if body.get("total_distance").is_some() {
        println!("{}", "📊 RESUMEN:".bright_green().bold());
        println!("   Odómetro inicial: {}", body["odometer_at_start"]);
        println!("   Odómetro final:   {}", body["odometer_at_end"]);
        println!("   Distancia total:  {} km", body["total_distance"]);
    }
    Ok(())
}

async fn owner_group(client: &Client, session: &Session) -> Result<()> {
    let response = client
        .get(format!("{}/api/owner-group", session.base_url))
        .send()
        .await?;
    print_response(response).await?;
    Ok(())
}

fn print_payload(payload: &Value) -> Result<()> {
    println!("{}", "📦 Payload:".bright_blue());
    println!("{}", serde_json::to_string_pretty(payload)?);
    println!();
    Ok(())
}

async fn print_response(response: Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;

    println!("{}", "📥 RESPUESTA:".bright_green().bold());
    if status.is_success() {
        println!("{}", format!("✅ {}", status).bright_green());
    } else {
        println!("{}", format!("⚠️ {}", status).bright_yellow());
    }

    let body: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));
    println!("{}", serde_json::to_string_pretty(&body)?);
    println!();
    Ok(body)
}
